//! Firework burst geometry and pointer mapping

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particle::Spark;
use crate::{normalize_percent, polar_to_cartesian};

/// Primary ring: 8 sparks every 45°, 20 px out, 0.05 s apart
pub const PRIMARY_SPARKS: usize = 8;
pub const PRIMARY_RADIUS: f32 = 20.0;
pub const PRIMARY_DELAY_STEP: f32 = 0.05;

/// Fine ring: 12 sparks every 30°, 30 px out, 0.03 s apart, 0.8 s long
pub const FINE_SPARKS: usize = 12;
pub const FINE_RADIUS: f32 = 30.0;
pub const FINE_DELAY_STEP: f32 = 0.03;
pub const FINE_DURATION: f32 = 0.8;

/// A click or tap in viewport pixels, with the bounding rect of the region
/// that received it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub client: Vec2,
    pub region_origin: Vec2,
    pub region_size: Vec2,
}

impl Pointer {
    pub fn new(client: Vec2, region_origin: Vec2, region_size: Vec2) -> Self {
        Self {
            client,
            region_origin,
            region_size,
        }
    }

    /// Click position as a percent of the region
    pub fn to_percent(&self) -> Option<Vec2> {
        normalize_percent(self.client, self.region_origin, self.region_size)
    }
}

fn ring(count: usize, radius: f32, delay_step: f32, duration: Option<f32>, size: f32) -> impl Iterator<Item = Spark> {
    let step = std::f32::consts::TAU / count as f32;
    (0..count).map(move |i| Spark {
        offset: polar_to_cartesian(radius, step * i as f32),
        delay: delay_step * i as f32,
        duration,
        size,
    })
}

/// Sparks radiating from a burst centre: the primary ring then the fine ring
pub fn burst_sparks() -> Vec<Spark> {
    ring(PRIMARY_SPARKS, PRIMARY_RADIUS, PRIMARY_DELAY_STEP, None, 2.0)
        .chain(ring(FINE_SPARKS, FINE_RADIUS, FINE_DELAY_STEP, Some(FINE_DURATION), 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_layout() {
        let sparks = burst_sparks();
        assert_eq!(sparks.len(), PRIMARY_SPARKS + FINE_SPARKS);

        for s in &sparks[..PRIMARY_SPARKS] {
            assert!((s.offset.length() - PRIMARY_RADIUS).abs() < 0.001);
            assert_eq!(s.duration, None);
        }
        for s in &sparks[PRIMARY_SPARKS..] {
            assert!((s.offset.length() - FINE_RADIUS).abs() < 0.001);
            assert_eq!(s.duration, Some(FINE_DURATION));
        }
    }

    #[test]
    fn test_primary_ring_angles_step_45_degrees() {
        let sparks = burst_sparks();
        for (i, s) in sparks[..PRIMARY_SPARKS].iter().enumerate() {
            let deg = s.offset.y.atan2(s.offset.x).to_degrees().rem_euclid(360.0);
            let expected = (i as f32 * 45.0).rem_euclid(360.0);
            let diff = (deg - expected).abs();
            assert!(diff < 0.01 || (360.0 - diff) < 0.01, "spark {i}: {deg} vs {expected}");
            assert!((s.delay - 0.05 * i as f32).abs() < 1e-6);
        }
        // 90° spark points straight down in screen space (positive y)
        assert!((sparks[2].offset.y - PRIMARY_RADIUS).abs() < 0.001);
    }

    #[test]
    fn test_pointer_to_percent() {
        let p = Pointer::new(Vec2::new(250.0, 100.0), Vec2::new(0.0, 0.0), Vec2::new(1000.0, 400.0));
        assert_eq!(p.to_percent(), Some(Vec2::new(25.0, 25.0)));

        let degenerate = Pointer::new(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(degenerate.to_percent(), None);
    }
}
