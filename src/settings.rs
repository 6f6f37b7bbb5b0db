//! Display preferences
//!
//! Read from LocalStorage on the web (the page never writes it) or from the
//! `TRICOLOR_FEST_SETTINGS` environment variable natively. Both hold JSON.

use serde::{Deserialize, Serialize};

use crate::sim::{Channel, ChannelConfig, ParticleEngine};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    /// Spawn count multiplier for periodic channels
    pub fn particle_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 0.75,
            QualityPreset::High => 1.0,
        }
    }
}

/// Page settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Decorative density preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Periodic decorations (dust, confetti, sparkles)
    pub particles: bool,
    /// Floating balloons on the main page
    pub balloons: bool,
    /// Click-to-burst fireworks on the main page
    pub fireworks: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no parallax)
    pub reduced_motion: bool,

    /// Fixed RNG seed; a clock-derived seed is used when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,

            particles: true,
            balloons: true,
            fireworks: true,

            master_volume: 0.8,

            reduced_motion: false,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Effective parallax (respects reduced_motion)
    pub fn effective_parallax(&self) -> bool {
        !self.reduced_motion
    }

    /// Whether a channel is switched on
    pub fn channel_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Balloons => self.balloons,
            Channel::Fireworks => self.fireworks,
            _ => self.particles,
        }
    }

    /// Start an engine for `config`, honouring the channel toggle and quality scale
    pub fn engine(&self, config: ChannelConfig, seed: u64, now_ms: u64) -> ParticleEngine {
        if !self.channel_enabled(config.channel) {
            return ParticleEngine::disabled(config);
        }
        ParticleEngine::start(config.scaled(self.quality.particle_scale()), seed, now_ms)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tricolor_fest_settings";

    /// Environment variable read by native builds
    #[allow(dead_code)]
    const ENV_KEY: &'static str = "TRICOLOR_FEST_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json_or_default(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the environment (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(Self::ENV_KEY) {
            Ok(json) => Self::from_json_or_default(&json),
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particle::presets::{BALLOONS, FIREWORKS, HEADER_SPARKLES};

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{"quality":"Low","seed":7}"#).unwrap();
        assert_eq!(s.quality, QualityPreset::Low);
        assert_eq!(s.seed, Some(7));
        assert!(s.particles);
        assert!(s.fireworks);
    }

    #[test]
    fn test_volume_is_clamped() {
        let s = Settings::from_json(r#"{"master_volume":3.5}"#).unwrap();
        assert_eq!(s.master_volume, 1.0);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert_eq!(Settings::from_json_or_default("{nope"), Settings::default());
    }

    #[test]
    fn test_quality_scales_batches() {
        let s = Settings::from_json(r#"{"quality":"Low"}"#).unwrap();
        assert_eq!(s.quality, QualityPreset::Low);
        let engine = s.engine(HEADER_SPARKLES, 1, 0);
        assert_eq!(engine.particles().len(), 8);
    }

    #[test]
    fn test_disabled_channels() {
        let s = Settings {
            balloons: false,
            fireworks: false,
            ..Settings::default()
        };
        assert!(!s.engine(BALLOONS, 1, 0).is_active());
        assert!(!s.engine(FIREWORKS, 1, 0).is_active());
        assert!(s.engine(HEADER_SPARKLES, 1, 0).is_active());
    }

    #[test]
    fn test_reduced_motion_disables_parallax() {
        let s = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!s.effective_parallax());
    }
}
