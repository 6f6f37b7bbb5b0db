//! HTML generation for particle channels
//!
//! Each channel is drawn as a flat list of absolutely positioned elements
//! whose motion is a CSS keyframe animation named after the channel.

use std::fmt::Write;

use crate::sim::{Channel, ChannelFrame, Particle};
use crate::sim::particle::Retention;

/// CSS class of one particle element
pub fn particle_class(channel: Channel) -> &'static str {
    match channel {
        Channel::LoadingDust => "dust",
        Channel::CelebrationConfetti | Channel::HeroConfetti => "confetti",
        Channel::HeaderSparkles | Channel::FooterSparkles => "sparkle",
        Channel::Balloons => "balloon",
        Channel::Fireworks => "firework",
    }
}

/// Container element id for a channel
pub fn container_id(channel: Channel) -> String {
    format!("fx-{}", channel.as_str())
}

fn particle_style(out: &mut String, channel: Channel, p: &Particle) {
    let _ = write!(out, "left:{:.2}%;", p.pos.x);
    // Balloons rise from below the region; only x is placed
    if channel != Channel::Balloons {
        let _ = write!(out, "top:{:.2}%;", p.pos.y);
    }
    let _ = write!(out, "--c:{};", p.color.hex());
    if let Some(size) = p.size {
        let _ = write!(out, "width:{:.1}px;height:{:.1}px;", size, size);
    }
    if let Some(speed) = p.speed {
        let _ = write!(out, "animation-duration:{:.2}s;", speed);
    }
    if let Some(delay) = p.delay {
        let _ = write!(out, "animation-delay:{:.2}s;", delay);
    }
}

fn write_particle(out: &mut String, channel: Channel, p: &Particle) {
    let _ = write!(
        out,
        r#"<div class="{}" data-id="{}" style=""#,
        particle_class(channel),
        p.id
    );
    particle_style(out, channel, p);
    out.push_str(r#"">"#);
    for spark in &p.sparks {
        let kind = if spark.duration.is_some() { "spark fine" } else { "spark" };
        let _ = write!(
            out,
            r#"<i class="{}" style="--dx:{:.1}px;--dy:{:.1}px;animation-delay:{:.2}s;"#,
            kind, spark.offset.x, spark.offset.y, spark.delay
        );
        if let Some(duration) = spark.duration {
            let _ = write!(out, "animation-duration:{:.2}s;", duration);
        }
        out.push_str(r#""></i>"#);
    }
    out.push_str("</div>");
}

/// Markup for every live particle of a channel
pub fn channel_markup(frame: &ChannelFrame<'_>) -> String {
    let mut out = String::with_capacity(frame.particles.len() * 128);
    for p in frame.particles {
        write_particle(&mut out, frame.channel, p);
    }
    out
}

/// DOM changes that bring a container from `rendered` ids to `frame`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPatch {
    Unchanged,
    /// Swap the whole container (replace-policy channels)
    Rebuild(String),
    /// Drop gone ids and append new ones, leaving kept elements (and their
    /// running animations) alone
    Update { remove: Vec<u32>, append: String },
}

/// Plan the update for one channel container
pub fn plan_patch(rendered: &[u32], frame: &ChannelFrame<'_>) -> ChannelPatch {
    let live: Vec<u32> = frame.particles.iter().map(|p| p.id).collect();
    if live == rendered {
        return ChannelPatch::Unchanged;
    }
    if frame.retention == Retention::Replace {
        return ChannelPatch::Rebuild(channel_markup(frame));
    }

    let remove: Vec<u32> = rendered.iter().copied().filter(|id| !live.contains(id)).collect();
    let mut append = String::new();
    for p in frame.particles.iter().filter(|p| !rendered.contains(&p.id)) {
        write_particle(&mut append, frame.channel, p);
    }
    ChannelPatch::Update { remove, append }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ParticleEngine, Pointer, presets};
    use glam::Vec2;

    #[test]
    fn test_one_element_per_particle() {
        let engine = ParticleEngine::start(presets::HERO_CONFETTI, 9, 0);
        let html = channel_markup(&ChannelFrame::from(&engine));
        assert_eq!(html.matches(r#"class="confetti""#).count(), 30);
        assert!(html.contains("animation-duration:"));
    }

    #[test]
    fn test_firework_has_sparks() {
        let mut engine = ParticleEngine::start(presets::FIREWORKS, 9, 0);
        let click = Pointer::new(Vec2::new(10.0, 10.0), Vec2::ZERO, Vec2::new(100.0, 100.0));
        engine.trigger(0, &click);
        let html = channel_markup(&ChannelFrame::from(&engine));
        assert!(html.contains("left:10.00%;top:10.00%;"));
        assert_eq!(html.matches("<i ").count(), 20);
        assert_eq!(html.matches("spark fine").count(), 12);
    }

    #[test]
    fn test_balloons_have_no_top() {
        let engine = ParticleEngine::start(presets::BALLOONS, 9, 0);
        let html = channel_markup(&ChannelFrame::from(&engine));
        assert!(!html.contains("top:"));
        assert_eq!(container_id(Channel::Balloons), "fx-balloons");
    }

    #[test]
    fn test_empty_channel() {
        let engine = ParticleEngine::disabled(presets::HEADER_SPARKLES);
        assert!(channel_markup(&ChannelFrame::from(&engine)).is_empty());
    }

    fn ids(engine: &ParticleEngine) -> Vec<u32> {
        engine.particles().iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_append_trim_keeps_existing_elements() {
        let mut engine = ParticleEngine::start(presets::CELEBRATION_CONFETTI, 4, 0);
        let ChannelPatch::Update { remove, append } = plan_patch(&[], &ChannelFrame::from(&engine)) else {
            panic!("expected incremental update");
        };
        assert!(remove.is_empty());
        assert_eq!(append.matches("<div ").count(), 20);

        // 20 kept, 20 appended
        let rendered = ids(&engine);
        engine.advance(2000);
        let ChannelPatch::Update { remove, append } = plan_patch(&rendered, &ChannelFrame::from(&engine)) else {
            panic!("expected incremental update");
        };
        assert!(remove.is_empty());
        assert_eq!(append.matches("<div ").count(), 20);
        for id in &rendered {
            assert!(!append.contains(&format!(r#"data-id="{}""#, id)));
        }

        // Trim to 30: the 10 oldest go, 30 stay untouched
        let rendered = ids(&engine);
        engine.advance(4000);
        let ChannelPatch::Update { remove, append } = plan_patch(&rendered, &ChannelFrame::from(&engine)) else {
            panic!("expected incremental update");
        };
        assert_eq!(remove, rendered[..10].to_vec());
        assert_eq!(append.matches("<div ").count(), 20);
    }

    #[test]
    fn test_overlapping_fireworks_patch_by_id() {
        let mut engine = ParticleEngine::start(presets::FIREWORKS, 9, 0);
        let click = Pointer::new(Vec2::new(10.0, 10.0), Vec2::ZERO, Vec2::new(100.0, 100.0));
        let a = engine.trigger(0, &click).unwrap();
        let rendered = ids(&engine);

        let b = engine.trigger(300, &click).unwrap();
        let ChannelPatch::Update { remove, append } = plan_patch(&rendered, &ChannelFrame::from(&engine)) else {
            panic!("expected incremental update");
        };
        assert!(remove.is_empty());
        assert!(append.contains(&format!(r#"data-id="{}""#, b)));
        assert!(!append.contains(&format!(r#"data-id="{}""#, a)));

        let rendered = ids(&engine);
        engine.advance(600);
        assert_eq!(
            plan_patch(&rendered, &ChannelFrame::from(&engine)),
            ChannelPatch::Update { remove: vec![a], append: String::new() }
        );
    }

    #[test]
    fn test_replace_channels_rebuild() {
        let mut engine = ParticleEngine::start(presets::HEADER_SPARKLES, 9, 0);
        let rendered = ids(&engine);
        assert_eq!(plan_patch(&rendered, &ChannelFrame::from(&engine)), ChannelPatch::Unchanged);

        engine.advance(3000);
        let ChannelPatch::Rebuild(html) = plan_patch(&rendered, &ChannelFrame::from(&engine)) else {
            panic!("expected rebuild");
        };
        assert_eq!(html.matches(r#"class="sparkle""#).count(), 15);
    }
}
