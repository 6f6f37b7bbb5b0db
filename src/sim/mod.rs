//! Deterministic simulation module
//!
//! All page logic lives here. This module must be pure and deterministic:
//! - Simulated clock only (advanced by `tick`)
//! - Seeded RNG only
//! - Timers owned by the screen or engine that scheduled them
//! - No DOM or platform dependencies

pub mod ceremony;
pub mod engine;
pub mod fireworks;
pub mod form;
pub mod frame;
pub mod loading;
pub mod page;
pub mod particle;
pub mod state;
pub mod tick;
pub mod timer;

pub use ceremony::{AnthemCommand, FlagCeremony};
pub use engine::ParticleEngine;
pub use fireworks::{Pointer, burst_sparks};
pub use form::{Field, FormDraft, FormScreen, SubmitOutcome, SubmitStatus, UserDetails, ValidationError};
pub use frame::{ChannelFrame, Frame, ScreenFrame};
pub use loading::{LoadingPhase, LoadingScreen};
pub use page::{PageState, Section};
pub use particle::{Channel, ChannelConfig, Particle, Spark, Swatch, presets};
pub use state::{AppEvent, AppState, CelebrationScreen, MainScreen, Screen, Transition, ViewState};
pub use tick::{TickInput, UiEvent, tick};
pub use timer::{TimerId, TimerQueue};
