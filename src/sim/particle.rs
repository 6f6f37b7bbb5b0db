//! Decorative particle types and batch generation
//!
//! `spawn_batch` is pure: given a channel configuration and an RNG it returns
//! the next batch. Scheduling and retention live in `engine`.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Palette colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Swatch {
    Saffron,
    White,
    Green,
    Navy,
    Blue,
}

impl Swatch {
    pub fn hex(&self) -> &'static str {
        match self {
            Swatch::Saffron => "#FF9933",
            Swatch::White => "#FFFFFF",
            Swatch::Green => "#138808",
            Swatch::Navy => "#000080",
            Swatch::Blue => "#1E90FF",
        }
    }
}

/// Saffron, white and green
pub const TRICOLOR: &[Swatch] = &[Swatch::Saffron, Swatch::White, Swatch::Green];
/// Tricolor plus the chakra navy
pub const FIREWORK_COLORS: &[Swatch] = &[Swatch::Saffron, Swatch::White, Swatch::Green, Swatch::Navy];
/// Heart colours used for balloons
pub const BALLOON_COLORS: &[Swatch] = &[Swatch::Saffron, Swatch::White, Swatch::Green, Swatch::Blue];
pub const WHITE_ONLY: &[Swatch] = &[Swatch::White];

/// Visual channel a particle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    LoadingDust,
    CelebrationConfetti,
    HeaderSparkles,
    HeroConfetti,
    FooterSparkles,
    Balloons,
    Fireworks,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::LoadingDust => "loading-dust",
            Channel::CelebrationConfetti => "celebration-confetti",
            Channel::HeaderSparkles => "header-sparkles",
            Channel::HeroConfetti => "hero-confetti",
            Channel::FooterSparkles => "footer-sparkles",
            Channel::Balloons => "balloons",
            Channel::Fireworks => "fireworks",
        }
    }
}

/// Inclusive-exclusive float range for randomized attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut Pcg32) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }
}

/// How a particle picks its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorPick {
    /// Uniform random pick from the palette
    Random,
    /// Palette entry `index % len` within the batch
    Cycle,
}

/// Animation delay hint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DelayHint {
    Random(Span),
    /// `step * index within batch` seconds
    Stagger(f32),
}

/// Where new particles appear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// Uniform within percent ranges
    Uniform { x: Span, y: Span },
    /// At the pointer position supplied by the triggering event
    Pointer,
}

/// When the engine spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnMode {
    /// A batch on activation and then every `interval_ms`
    Periodic { interval_ms: u64 },
    /// A single batch on activation
    Once,
    /// One burst per click, removed `lifetime_ms` later
    OnClick { lifetime_ms: u64 },
}

/// What happens to older particles when a batch arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Retention {
    /// New batch supersedes the previous one outright
    Replace,
    /// Keep the newest `keep` existing particles, then append the batch
    AppendTrim { keep: usize },
    /// Each particle lives until its own expiry timer fires
    Expire,
}

/// Configuration for one decorative channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelConfig {
    pub channel: Channel,
    pub spawn_count: usize,
    pub mode: SpawnMode,
    pub retention: Retention,
    pub palette: &'static [Swatch],
    pub color_pick: ColorPick,
    pub placement: Placement,
    pub size: Option<Span>,
    pub speed: Option<Span>,
    pub delay: Option<DelayHint>,
}

impl ChannelConfig {
    /// Scale the batch size by a quality factor, keeping at least one particle
    pub fn scaled(mut self, factor: f32) -> Self {
        if self.spawn_count > 0 {
            let scaled = (self.spawn_count as f32 * factor).round() as usize;
            self.spawn_count = scaled.max(1);
        }
        self
    }

    /// Upper bound on live particles for bounded channels
    pub fn retention_bound(&self) -> Option<usize> {
        match self.retention {
            Retention::Replace => Some(self.spawn_count),
            Retention::AppendTrim { keep } => Some(keep + self.spawn_count),
            Retention::Expire => None,
        }
    }
}

/// A secondary spark radiating from a firework centre (pixel offsets)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spark {
    pub offset: Vec2,
    /// Seconds
    pub delay: f32,
    /// Seconds, when it differs from the burst default
    pub duration: Option<f32>,
    /// Rendering size class (2 = primary, 1 = fine)
    pub size: f32,
}

/// One short-lived decorative entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    /// Unique among live particles of the same engine
    pub id: u32,
    /// Percent of the host region
    pub pos: Vec2,
    pub color: Swatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    /// Animation duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    /// Animation delay in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sparks: Vec<Spark>,
}

fn pick_color(config: &ChannelConfig, index: usize, rng: &mut Pcg32) -> Swatch {
    let fallback = Swatch::White;
    match config.color_pick {
        ColorPick::Random => config.palette.choose(rng).copied().unwrap_or(fallback),
        ColorPick::Cycle => {
            if config.palette.is_empty() {
                fallback
            } else {
                config.palette[index % config.palette.len()]
            }
        }
    }
}

/// Build one particle at `pos`
pub fn spawn_one(config: &ChannelConfig, rng: &mut Pcg32, id: u32, index: usize, pos: Vec2) -> Particle {
    let color = pick_color(config, index, rng);
    let size = config.size.map(|s| s.sample(rng));
    let speed = config.speed.map(|s| s.sample(rng));
    let delay = config.delay.map(|d| match d {
        DelayHint::Random(span) => span.sample(rng),
        DelayHint::Stagger(step) => step * index as f32,
    });
    Particle {
        id,
        pos,
        color,
        size,
        speed,
        delay,
        sparks: Vec::new(),
    }
}

/// Generate a batch of `config.spawn_count` particles with ids starting at `first_id`.
///
/// Pointer-placed channels have no batch form and return an empty vec.
pub fn spawn_batch(config: &ChannelConfig, rng: &mut Pcg32, first_id: u32) -> Vec<Particle> {
    let Placement::Uniform { x, y } = config.placement else {
        return Vec::new();
    };
    (0..config.spawn_count)
        .map(|i| {
            let pos = Vec2::new(x.sample(rng), y.sample(rng));
            spawn_one(config, rng, first_id + i as u32, i, pos)
        })
        .collect()
}

/// `spawn_batch` from a bare seed
pub fn spawn_batch_seeded(config: &ChannelConfig, seed: u64) -> Vec<Particle> {
    let mut rng = Pcg32::seed_from_u64(seed);
    spawn_batch(config, &mut rng, 0)
}

/// Channel presets
pub mod presets {
    use super::*;
    use crate::consts::{FIREWORK_LIFETIME_MS, LOADING_DUST_COUNT};

    const FULL: Span = Span::new(0.0, 100.0);

    pub const LOADING_DUST: ChannelConfig = ChannelConfig {
        channel: Channel::LoadingDust,
        spawn_count: LOADING_DUST_COUNT,
        mode: SpawnMode::Once,
        retention: Retention::Replace,
        palette: TRICOLOR,
        color_pick: ColorPick::Cycle,
        placement: Placement::Uniform { x: FULL, y: FULL },
        size: None,
        speed: Some(Span::new(2.0, 4.0)),
        delay: Some(DelayHint::Random(Span::new(0.0, 2.0))),
    };

    pub const CELEBRATION_CONFETTI: ChannelConfig = ChannelConfig {
        channel: Channel::CelebrationConfetti,
        spawn_count: 20,
        mode: SpawnMode::Periodic { interval_ms: 2000 },
        retention: Retention::AppendTrim { keep: 30 },
        palette: TRICOLOR,
        color_pick: ColorPick::Random,
        placement: Placement::Uniform { x: FULL, y: Span::new(0.0, 0.0) },
        size: None,
        speed: Some(Span::new(3.0, 4.0)),
        delay: None,
    };

    pub const HEADER_SPARKLES: ChannelConfig = ChannelConfig {
        channel: Channel::HeaderSparkles,
        spawn_count: 15,
        mode: SpawnMode::Periodic { interval_ms: 3000 },
        retention: Retention::Replace,
        palette: TRICOLOR,
        color_pick: ColorPick::Random,
        placement: Placement::Uniform { x: FULL, y: FULL },
        size: None,
        speed: None,
        delay: Some(DelayHint::Random(Span::new(0.0, 2.0))),
    };

    pub const HERO_CONFETTI: ChannelConfig = ChannelConfig {
        channel: Channel::HeroConfetti,
        spawn_count: 30,
        mode: SpawnMode::Periodic { interval_ms: 4000 },
        retention: Retention::AppendTrim { keep: 20 },
        palette: TRICOLOR,
        color_pick: ColorPick::Random,
        placement: Placement::Uniform { x: FULL, y: Span::new(0.0, 0.0) },
        size: Some(Span::new(4.0, 12.0)),
        speed: Some(Span::new(3.0, 5.0)),
        delay: Some(DelayHint::Random(Span::new(0.0, 1.0))),
    };

    pub const FOOTER_SPARKLES: ChannelConfig = ChannelConfig {
        channel: Channel::FooterSparkles,
        spawn_count: 12,
        mode: SpawnMode::Periodic { interval_ms: 5000 },
        retention: Retention::Replace,
        palette: WHITE_ONLY,
        color_pick: ColorPick::Cycle,
        placement: Placement::Uniform { x: FULL, y: Span::new(0.0, 60.0) },
        size: None,
        speed: None,
        delay: Some(DelayHint::Random(Span::new(0.0, 3.0))),
    };

    pub const BALLOONS: ChannelConfig = ChannelConfig {
        channel: Channel::Balloons,
        spawn_count: 6,
        mode: SpawnMode::Once,
        retention: Retention::Replace,
        palette: BALLOON_COLORS,
        color_pick: ColorPick::Random,
        placement: Placement::Uniform { x: FULL, y: Span::new(0.0, 0.0) },
        size: Some(Span::new(20.0, 40.0)),
        speed: Some(Span::new(5.0, 15.0)),
        delay: Some(DelayHint::Stagger(0.5)),
    };

    pub const FIREWORKS: ChannelConfig = ChannelConfig {
        channel: Channel::Fireworks,
        spawn_count: 1,
        mode: SpawnMode::OnClick { lifetime_ms: FIREWORK_LIFETIME_MS },
        retention: Retention::Expire,
        palette: FIREWORK_COLORS,
        color_pick: ColorPick::Random,
        placement: Placement::Pointer,
        size: None,
        speed: None,
        delay: None,
    };
}
