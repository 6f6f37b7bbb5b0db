//! Preloader: deterministic progress ramp and decorative dust

use serde::Serialize;

use super::engine::ParticleEngine;
use super::particle::presets::LOADING_DUST;
use super::timer::{TimerId, TimerQueue};
use crate::Settings;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadingTimer {
    Initials,
    Step,
    Complete,
}

/// Where the preloader is in its sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadingPhase {
    Ramping,
    /// Reached 100, waiting out the terminal delay
    Finishing,
    Done,
}

#[derive(Debug, Clone)]
pub struct LoadingScreen {
    entered_ms: u64,
    progress: u8,
    initials_visible: bool,
    phase: LoadingPhase,
    ramp: Option<TimerId>,
    timers: TimerQueue<LoadingTimer>,
    pub dust: ParticleEngine,
}

impl LoadingScreen {
    pub fn enter(now_ms: u64, seed: u64, settings: &Settings) -> Self {
        let mut timers = TimerQueue::new();
        timers.after(now_ms, LOADING_INITIALS_MS, LoadingTimer::Initials);
        let ramp = timers.every(now_ms, LOADING_TICK_MS, LoadingTimer::Step);
        Self {
            entered_ms: now_ms,
            progress: 0,
            initials_visible: false,
            phase: LoadingPhase::Ramping,
            ramp: Some(ramp),
            timers,
            dust: settings.engine(LOADING_DUST, seed, now_ms),
        }
    }

    /// Fire due timers. Returns true exactly once, when loading completes.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        self.dust.advance(now_ms);

        let mut completed = false;
        while let Some((_, timer)) = self.timers.pop_due(now_ms) {
            match timer {
                LoadingTimer::Initials => self.initials_visible = true,
                LoadingTimer::Step => {
                    self.progress = self.progress.saturating_add(LOADING_STEP).min(100);
                    if self.progress == 100 {
                        self.finish_ramp(now_ms);
                    }
                }
                LoadingTimer::Complete => {
                    self.phase = LoadingPhase::Done;
                    completed = true;
                }
            }
        }
        completed
    }

    fn finish_ramp(&mut self, now_ms: u64) {
        if let Some(ramp) = self.ramp.take() {
            self.timers.cancel(ramp);
        }
        self.phase = LoadingPhase::Finishing;
        // When catching up on a long frame `now_ms` is past the step that hit
        // 100; the delay runs from that step
        let steps = u64::from(100u8.div_ceil(LOADING_STEP));
        let hit_at = (self.entered_ms + steps * LOADING_TICK_MS).min(now_ms);
        self.timers.after(hit_at, LOADING_COMPLETE_DELAY_MS, LoadingTimer::Complete);
    }

    pub fn teardown(&mut self) {
        self.timers.clear();
        self.ramp = None;
        self.dust.teardown();
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn initials_visible(&self) -> bool {
        self.initials_visible
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_reaches_100_in_fifty_steps() {
        let mut screen = LoadingScreen::enter(0, 1, &Settings::default());
        assert_eq!(screen.progress(), 0);
        screen.advance(50);
        assert_eq!(screen.progress(), 2);
        screen.advance(2450);
        assert_eq!(screen.progress(), 98);
        assert_eq!(screen.phase(), LoadingPhase::Ramping);
        screen.advance(2500);
        assert_eq!(screen.progress(), 100);
        assert_eq!(screen.phase(), LoadingPhase::Finishing);
    }

    #[test]
    fn test_initials_reveal() {
        let mut screen = LoadingScreen::enter(0, 1, &Settings::default());
        screen.advance(499);
        assert!(!screen.initials_visible());
        screen.advance(500);
        assert!(screen.initials_visible());
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut screen = LoadingScreen::enter(0, 1, &Settings::default());
        let mut completions = Vec::new();
        let mut now = 0;
        while now <= 10_000 {
            if screen.advance(now) {
                completions.push(now);
            }
            now += 50;
        }
        assert_eq!(completions, vec![3300]);
        assert_eq!(screen.phase(), LoadingPhase::Done);
    }

    #[test]
    fn test_completion_once_with_one_big_step() {
        let mut screen = LoadingScreen::enter(0, 1, &Settings::default());
        assert!(screen.advance(60_000));
        assert!(!screen.advance(120_000));
        assert_eq!(screen.progress(), 100);
    }

    #[test]
    fn test_teardown_freezes_progress() {
        let mut screen = LoadingScreen::enter(0, 1, &Settings::default());
        screen.advance(1000);
        let progress = screen.progress();
        screen.teardown();
        assert!(!screen.advance(60_000));
        assert_eq!(screen.progress(), progress);
    }

    #[test]
    fn test_dust_is_static() {
        let mut screen = LoadingScreen::enter(0, 1, &Settings::default());
        assert_eq!(screen.dust.particles().len(), 20);
        let rev = screen.dust.revision();
        screen.advance(3000);
        assert_eq!(screen.dust.revision(), rev);
    }
}
