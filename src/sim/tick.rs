//! Simulation tick
//!
//! Applies the frame's UI events, advances the clock, then fires every timer
//! that came due. Identical seeds and input traces give identical states.

use super::ceremony::AnthemCommand;
use super::fireworks::Pointer;
use super::form::{Field, SubmitOutcome};
use super::page::Section;
use super::state::{AppEvent, AppState, Screen, Transition};
use crate::consts::MAX_FRAME_MS;

/// A user interaction from the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    FieldChanged { field: Field, value: String },
    FieldFocused(Option<Field>),
    Submit,
    /// Continue button on the celebration screen
    Continue,
    /// Click inside the fireworks region
    Click(Pointer),
    Scrolled(f32),
    Navigate(Section),
    ToggleMenu,
    DismissWelcome,
    OpenFlag,
    ToggleAnthem,
    PlaybackFailed,
    PlaybackEnded,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<UiEvent>,
}

impl TickInput {
    pub fn single(event: UiEvent) -> Self {
        Self { events: vec![event] }
    }
}

/// Advance the application by `dt_ms`
pub fn tick(state: &mut AppState, input: &TickInput, dt_ms: u64) {
    state.now_ms += dt_ms.min(MAX_FRAME_MS);

    for event in &input.events {
        if let Some(transition) = handle_event(state, event) {
            state.apply(transition);
        }
    }

    // A screen entered this tick has nothing due yet, so two passes suffice
    for _ in 0..2 {
        match advance_screen(state) {
            Some(transition) => {
                state.apply(transition);
            }
            None => break,
        }
    }
}

fn advance_screen(state: &mut AppState) -> Option<Transition> {
    let now = state.now_ms;
    match &mut state.screen {
        Screen::Loading(s) => s.advance(now).then_some(Transition::LoadingComplete),
        Screen::FormEntry(s) => s.advance(now).map(Transition::Submitted),
        Screen::Celebration(s) => {
            s.advance(now);
            None
        }
        Screen::Main(s) => {
            s.advance(now);
            None
        }
    }
}

fn handle_event(state: &mut AppState, event: &UiEvent) -> Option<Transition> {
    let now = state.now_ms;
    let view = state.screen.view_state();
    match (&mut state.screen, event) {
        (Screen::FormEntry(form), UiEvent::FieldChanged { field, value }) => {
            form.set_field(*field, value.clone());
        }
        (Screen::FormEntry(form), UiEvent::FieldFocused(field)) => form.focus(*field),
        (Screen::FormEntry(form), UiEvent::Submit) => {
            if let SubmitOutcome::Rejected(e) = form.submit(now) {
                state.events.push(AppEvent::ValidationFailed(e));
            }
        }
        (Screen::Celebration(c), UiEvent::Continue) => {
            if c.accepts_continue() {
                return Some(Transition::Continue);
            }
            log::debug!("Continue before button shown, ignoring");
        }
        (Screen::Main(m), UiEvent::Click(pointer)) => {
            m.fireworks.trigger(now, pointer);
        }
        (Screen::Main(m), UiEvent::Scrolled(y)) => m.page.scrolled_to(*y),
        (Screen::Main(m), UiEvent::Navigate(section)) => {
            let target = m.page.navigate(*section);
            state.events.push(AppEvent::ScrollTo(target));
        }
        (Screen::Main(m), UiEvent::ToggleMenu) => m.page.toggle_menu(),
        (Screen::Main(m), UiEvent::DismissWelcome) => m.page.dismiss_welcome(),
        (Screen::Main(m), UiEvent::OpenFlag) => m.ceremony.open_flag(now),
        (Screen::Main(m), UiEvent::ToggleAnthem) => {
            if let Some(command) = m.ceremony.toggle_anthem() {
                state.events.push(AppEvent::Anthem(command));
            }
        }
        (Screen::Main(m), UiEvent::PlaybackFailed) => {
            log::warn!("Anthem playback failed, prompting for volume");
            m.ceremony.playback_failed();
            state.events.push(AppEvent::PlaybackPrompt);
        }
        (Screen::Main(m), UiEvent::PlaybackEnded) => {
            if m.ceremony.playing() {
                m.ceremony.playback_ended();
                state.events.push(AppEvent::Anthem(AnthemCommand::Pause));
            }
        }
        (_, event) => log::debug!("Ignoring {:?} on {}", event, view.as_str()),
    }
    None
}
