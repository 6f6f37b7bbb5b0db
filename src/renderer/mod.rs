//! DOM rendering module
//!
//! Particles are plain elements animated by CSS keyframes; the simulation
//! only decides which exist and where.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod markup;

#[cfg(target_arch = "wasm32")]
pub use dom::DomRenderer;
pub use markup::{ChannelPatch, channel_markup, container_id, particle_class, plan_patch};
