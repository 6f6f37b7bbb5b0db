//! Simulated timers
//!
//! Every screen and engine owns its own `TimerQueue`. Time only moves when the
//! owner drains the queue with the current clock, so a queue that has been
//! cleared (or dropped with its owner) can never fire again.

use serde::Serialize;

/// Handle to a scheduled timer, unique within its queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due_ms: u64,
    /// Repeat interval for intervals, `None` for one-shots
    period_ms: Option<u64>,
    event: E,
}

/// Pending one-shot and repeating timers for a single owner
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    timers: Vec<Timer<E>>,
    next_id: u64,
    fired: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
            fired: 0,
        }
    }

    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Fire `event` once, `delay_ms` after `now_ms`
    pub fn after(&mut self, now_ms: u64, delay_ms: u64, event: E) -> TimerId {
        let id = self.alloc_id();
        self.timers.push(Timer {
            id,
            due_ms: now_ms + delay_ms,
            period_ms: None,
            event,
        });
        id
    }

    /// Fire `event` every `period_ms` starting one period after `now_ms`
    pub fn every(&mut self, now_ms: u64, period_ms: u64, event: E) -> TimerId {
        // A zero period would never let the clock advance
        let period_ms = period_ms.max(1);
        let id = self.alloc_id();
        self.timers.push(Timer {
            id,
            due_ms: now_ms + period_ms,
            period_ms: Some(period_ms),
            event,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel everything still pending
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Total callbacks fired over the queue's lifetime
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl<E: Clone> TimerQueue<E> {
    /// Pop the earliest timer due at or before `now_ms`.
    ///
    /// Ties resolve by scheduling order. Intervals are re-armed one period
    /// later, so a caller looping on this catches up on missed ticks in order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerId, E)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id.0))
            .map(|(i, _)| i)?;

        self.fired += 1;
        let timer = &self.timers[idx];
        let fired = (timer.id, timer.event.clone());
        let period_ms = timer.period_ms;
        match period_ms {
            Some(period) => self.timers[idx].due_ms += period,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ev {
        A,
        B,
    }

    fn drain(q: &mut TimerQueue<Ev>, now: u64) -> Vec<Ev> {
        let mut out = Vec::new();
        while let Some((_, ev)) = q.pop_due(now) {
            out.push(ev);
        }
        out
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut q = TimerQueue::new();
        q.after(0, 100, Ev::A);
        assert!(drain(&mut q, 99).is_empty());
        assert_eq!(drain(&mut q, 100), vec![Ev::A]);
        assert!(drain(&mut q, 1000).is_empty());
        assert_eq!(q.fired(), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn test_interval_catches_up_in_order() {
        let mut q = TimerQueue::new();
        q.every(0, 50, Ev::A);
        q.after(0, 120, Ev::B);
        // 50, 100, 120(B), 150
        assert_eq!(drain(&mut q, 150), vec![Ev::A, Ev::A, Ev::B, Ev::A]);
        assert!(drain(&mut q, 199).is_empty());
        assert_eq!(drain(&mut q, 200), vec![Ev::A]);
    }

    #[test]
    fn test_cancel() {
        let mut q = TimerQueue::new();
        let a = q.every(0, 10, Ev::A);
        let b = q.after(0, 10, Ev::B);
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.len(), 1);
        assert_eq!(drain(&mut q, 100), vec![Ev::B]);
        assert!(!q.cancel(b));
    }

    #[test]
    fn test_clear_stops_everything() {
        let mut q = TimerQueue::new();
        q.every(0, 10, Ev::A);
        q.after(0, 5, Ev::B);
        q.clear();
        assert!(drain(&mut q, 10_000).is_empty());
        assert_eq!(q.fired(), 0);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut q = TimerQueue::new();
        q.every(0, 0, Ev::A);
        assert_eq!(drain(&mut q, 3).len(), 3);
    }
}
