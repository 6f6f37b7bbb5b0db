//! Anthem playback using the Web Audio API
//!
//! The tune is synthesised from a note table, no media files needed. The
//! player is owned by the main page binding: created when the page is
//! entered and dropped (silenced, context closed) when it goes away.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

/// Why the anthem could not start
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio context unavailable")]
    ContextUnavailable,
    #[error("audio context suspended until a user gesture")]
    Suspended,
    #[error("failed to build audio graph: {0}")]
    Node(String),
}

impl From<JsValue> for PlaybackError {
    fn from(value: JsValue) -> Self {
        PlaybackError::Node(format!("{:?}", value))
    }
}

/// Seconds per beat
const BEAT: f64 = 0.42;

/// Wall-clock wait for a suspended context to start running
const RESUME_GRACE_MS: f64 = 1000.0;

// (frequency Hz, beats); 0.0 is a rest
const C4: f32 = 261.63;
const D4: f32 = 293.66;
const E4: f32 = 329.63;
const F4: f32 = 349.23;
const G4: f32 = 392.00;
const A4: f32 = 440.00;
const B4: f32 = 493.88;
const C5: f32 = 523.25;

const MELODY: &[(f32, f32)] = &[
    (C4, 1.0),
    (D4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (D4, 1.0),
    (E4, 1.0),
    (F4, 2.0),
    (0.0, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (E4, 1.0),
    (D4, 1.0),
    (D4, 1.0),
    (D4, 1.0),
    (B4, 0.5),
    (D4, 0.5),
    (C4, 3.0),
    (0.0, 1.0),
    (G4, 1.0),
    (A4, 1.0),
    (B4, 1.0),
    (C5, 4.0),
];

/// The anthem player
pub struct AnthemPlayer {
    ctx: Option<AudioContext>,
    volume: f32,
    voices: Vec<OscillatorNode>,
    /// Context time at which the current playback ends
    ends_at: Option<f64>,
    /// Set by the rejection handler of a `resume()` promise
    resume_rejected: Rc<Cell<bool>>,
    /// `Date::now()` by which a resumed context must be running
    resume_deadline: Option<f64>,
}

impl AnthemPlayer {
    /// Acquire an audio context for the page
    pub fn acquire(master_volume: f32) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - anthem disabled");
        }
        Self {
            ctx,
            volume: master_volume.clamp(0.0, 1.0),
            voices: Vec::new(),
            ends_at: None,
            resume_rejected: Rc::new(Cell::new(false)),
            resume_deadline: None,
        }
    }

    /// Start the anthem from the top
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        self.stop_voices();
        let ctx = self.ctx.as_ref().ok_or(PlaybackError::ContextUnavailable)?;

        // resume() settles later; check_resumed reports the outcome
        if ctx.state() == AudioContextState::Suspended {
            let promise = ctx.resume().map_err(|_| PlaybackError::Suspended)?;
            let rejected = self.resume_rejected.clone();
            let on_reject = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| rejected.set(true));
            let _ = promise.catch(&on_reject);
            on_reject.forget();
            self.resume_deadline = Some(js_sys::Date::now() + RESUME_GRACE_MS);
        }

        let mut t = ctx.current_time() + 0.05;
        let mut voices = Vec::with_capacity(MELODY.len());
        for &(freq, beats) in MELODY {
            let len = BEAT * beats as f64;
            if freq > 0.0 {
                voices.push(Self::note(ctx, freq, t, len, self.volume)?);
            }
            t += len;
        }

        log::info!("Anthem playing ({} notes)", voices.len());
        self.voices = voices;
        self.ends_at = Some(t);
        Ok(())
    }

    /// Fails once if the context did not leave the suspended state after a
    /// `play`, either because `resume()` was rejected or it never settled in
    /// time. The scheduled notes are dropped.
    pub fn check_resumed(&mut self) -> Result<(), PlaybackError> {
        let Some(deadline) = self.resume_deadline else {
            return Ok(());
        };
        let running = self
            .ctx
            .as_ref()
            .is_some_and(|ctx| ctx.state() == AudioContextState::Running);

        if self.resume_rejected.replace(false) || (!running && js_sys::Date::now() >= deadline) {
            self.stop_voices();
            return Err(PlaybackError::Suspended);
        }
        if running {
            self.resume_deadline = None;
        }
        Ok(())
    }

    /// Silence any scheduled notes
    pub fn pause(&mut self) {
        if !self.voices.is_empty() {
            log::info!("Anthem paused");
        }
        self.stop_voices();
    }

    /// True once a started playback has run to its end
    pub fn finished(&self) -> bool {
        match (&self.ctx, self.ends_at) {
            (Some(ctx), Some(end)) => ctx.current_time() >= end,
            _ => false,
        }
    }

    /// Clear the finished marker after it has been reported
    pub fn acknowledge_end(&mut self) {
        self.ends_at = None;
        self.voices.clear();
    }

    fn stop_voices(&mut self) {
        for osc in self.voices.drain(..) {
            osc.stop().ok();
        }
        self.ends_at = None;
        self.resume_deadline = None;
    }

    /// One note: a triangle voice with a short attack and release
    fn note(ctx: &AudioContext, freq: f32, t: f64, len: f64, vol: f32) -> Result<OscillatorNode, PlaybackError> {
        let (osc, gain) = Self::create_osc(ctx, freq, OscillatorType::Triangle)?;
        let peak = vol * 0.3;

        gain.gain().set_value_at_time(0.0001, t)?;
        gain.gain().linear_ramp_to_value_at_time(peak, t + 0.03)?;
        gain.gain().set_value_at_time(peak, t + len * 0.7)?;
        gain.gain().exponential_ramp_to_value_at_time(0.0001, t + len)?;

        osc.start_with_when(t)?;
        osc.stop_with_when(t + len + 0.02)?;
        Ok(osc)
    }

    /// Create an oscillator routed through a gain node
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Result<(OscillatorNode, GainNode), PlaybackError> {
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        Ok((osc, gain))
    }
}

impl Drop for AnthemPlayer {
    fn drop(&mut self) {
        self.stop_voices();
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
            log::debug!("Anthem player released");
        }
    }
}
