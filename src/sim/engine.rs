//! Ephemeral particle engine
//!
//! One engine drives one decorative channel: it owns the live particles, the
//! RNG that generates them and the timers that spawn and expire them.
//! Engines never share state; tearing one down cancels its timers.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::fireworks::{Pointer, burst_sparks};
use super::particle::{ChannelConfig, Particle, Retention, SpawnMode, spawn_batch, spawn_one};
use super::timer::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTimer {
    Spawn,
    Expire(u32),
}

#[derive(Debug, Clone)]
pub struct ParticleEngine {
    config: ChannelConfig,
    rng: Pcg32,
    particles: Vec<Particle>,
    timers: TimerQueue<EngineTimer>,
    next_id: u32,
    active: bool,
    /// Bumped on every change to `particles`
    revision: u64,
}

impl ParticleEngine {
    /// Activate a channel at `now_ms`. Periodic and one-shot channels emit
    /// their first batch immediately.
    pub fn start(config: ChannelConfig, seed: u64, now_ms: u64) -> Self {
        let mut engine = Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            particles: Vec::new(),
            timers: TimerQueue::new(),
            next_id: 1,
            active: true,
            revision: 0,
        };

        match config.mode {
            SpawnMode::Periodic { interval_ms } => {
                engine.spawn_batch();
                engine.timers.every(now_ms, interval_ms, EngineTimer::Spawn);
            }
            SpawnMode::Once => engine.spawn_batch(),
            SpawnMode::OnClick { .. } => {}
        }

        log::debug!(
            "Engine {} started ({} particles)",
            config.channel.as_str(),
            engine.particles.len()
        );
        engine
    }

    /// A channel switched off by settings: empty, never spawns
    pub fn disabled(config: ChannelConfig) -> Self {
        Self {
            config,
            rng: Pcg32::seed_from_u64(0),
            particles: Vec::new(),
            timers: TimerQueue::new(),
            next_id: 1,
            active: false,
            revision: 0,
        }
    }

    fn alloc_ids(&mut self, count: usize) -> u32 {
        let first = self.next_id;
        self.next_id = self.next_id.wrapping_add(count as u32);
        first
    }

    fn spawn_batch(&mut self) {
        let first_id = self.alloc_ids(self.config.spawn_count);
        let batch = spawn_batch(&self.config, &mut self.rng, first_id);

        match self.config.retention {
            Retention::Replace => self.particles = batch,
            Retention::AppendTrim { keep } => {
                let excess = self.particles.len().saturating_sub(keep);
                self.particles.drain(..excess);
                self.particles.extend(batch);
            }
            Retention::Expire => self.particles.extend(batch),
        }
        self.revision += 1;
    }

    /// Fire every timer due at or before `now_ms`. Returns how many fired.
    pub fn advance(&mut self, now_ms: u64) -> usize {
        if !self.active {
            return 0;
        }

        let mut fired = 0;
        while let Some((_, timer)) = self.timers.pop_due(now_ms) {
            fired += 1;
            match timer {
                EngineTimer::Spawn => self.spawn_batch(),
                EngineTimer::Expire(id) => {
                    self.particles.retain(|p| p.id != id);
                    self.revision += 1;
                }
            }
        }
        fired
    }

    /// Spawn a burst at the pointer for click-driven channels.
    ///
    /// Returns the new particle's id, or `None` when the channel is not
    /// click-driven, inactive, or the region is degenerate.
    pub fn trigger(&mut self, now_ms: u64, pointer: &Pointer) -> Option<u32> {
        let SpawnMode::OnClick { lifetime_ms } = self.config.mode else {
            return None;
        };
        if !self.active {
            return None;
        }
        let Some(pos) = pointer.to_percent() else {
            log::debug!("Ignoring click on zero-sized region");
            return None;
        };

        let id = self.alloc_ids(1);
        let mut particle = spawn_one(&self.config, &mut self.rng, id, 0, pos);
        particle.sparks = burst_sparks();
        self.particles.push(particle);
        self.revision += 1;

        // Keyed by id so overlapping bursts expire independently
        self.timers.after(now_ms, lifetime_ms, EngineTimer::Expire(id));
        Some(id)
    }

    /// Cancel all pending timers. The collection is frozen from here on.
    pub fn teardown(&mut self) {
        if self.active {
            log::debug!(
                "Engine {} torn down ({} timers cancelled)",
                self.config.channel.as_str(),
                self.timers.len()
            );
        }
        self.timers.clear();
        self.active = false;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Timer callbacks fired over the engine's lifetime
    pub fn timer_firings(&self) -> u64 {
        self.timers.fired()
    }
}
