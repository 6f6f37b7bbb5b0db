//! Tricolor Fest - Independence Day celebration landing page
//!
//! Core modules:
//! - `sim`: Deterministic view-state flow and particle engines (simulated clock)
//! - `settings`: Quality/motion preferences and RNG seed
//! - `renderer`: particle markup and the DOM renderer consuming `sim::Frame`
//! - `audio`: Anthem playback owned by the main screen (wasm32)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Timing and count constants (milliseconds unless noted)
pub mod consts {
    /// Fixed tick used by headless drivers and tests
    pub const SIM_DT_MS: u64 = 50;
    /// Largest frame delta accepted from the animation loop
    pub const MAX_FRAME_MS: u64 = 250;

    /// Preloader progress ramp
    pub const LOADING_TICK_MS: u64 = 50;
    pub const LOADING_STEP: u8 = 2;
    pub const LOADING_INITIALS_MS: u64 = 500;
    pub const LOADING_COMPLETE_DELAY_MS: u64 = 800;
    pub const LOADING_DUST_COUNT: usize = 20;

    /// Simulated form submission latency
    pub const SUBMIT_LATENCY_MS: u64 = 1500;

    /// Celebration screen reveals
    pub const CELEBRATION_MESSAGE_MS: u64 = 500;
    pub const CELEBRATION_BUTTON_MS: u64 = 2000;

    /// Hero banner crowd reveal
    pub const HERO_CROWD_MS: u64 = 500;

    /// Flag ceremony reveals (after the flag is opened)
    pub const CEREMONY_PLAY_BUTTON_MS: u64 = 1000;
    pub const CEREMONY_FIGHTERS_MS: u64 = 2000;

    /// Header turns opaque past this scroll offset (px)
    pub const HEADER_SCROLL_THRESHOLD: f32 = 50.0;
    /// Parallax speed factor for the hero section
    pub const PARALLAX_SPEED: f32 = 0.5;

    /// Firework burst lifetime
    pub const FIREWORK_LIFETIME_MS: u64 = 600;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Map a point inside a rectangle to percent coordinates (0-100 on both axes)
///
/// Returns `None` for a degenerate rectangle.
pub fn normalize_percent(point: Vec2, origin: Vec2, size: Vec2) -> Option<Vec2> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    let pct = (point - origin) / size * 100.0;
    Some(pct.clamp(Vec2::ZERO, Vec2::splat(100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_percent() {
        let p = normalize_percent(Vec2::new(150.0, 75.0), Vec2::new(100.0, 50.0), Vec2::new(100.0, 50.0));
        assert_eq!(p, Some(Vec2::new(50.0, 50.0)));

        // Outside the region clamps to the edge
        let p = normalize_percent(Vec2::new(0.0, 500.0), Vec2::new(100.0, 50.0), Vec2::new(100.0, 50.0));
        assert_eq!(p, Some(Vec2::new(0.0, 100.0)));

        assert_eq!(normalize_percent(Vec2::ONE, Vec2::ZERO, Vec2::new(0.0, 10.0)), None);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(20.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 0.001);
        assert!((p.y - 20.0).abs() < 0.001);
    }
}
