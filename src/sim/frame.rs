//! Read-only snapshot of the application for the presentation layer

use serde::Serialize;

use super::engine::ParticleEngine;
use super::form::{FormDraft, SubmitStatus, UserDetails, ValidationError};
use super::loading::LoadingPhase;
use super::particle::{Channel, Particle, Retention};
use super::state::{AppState, Screen, ViewState};

/// One particle channel's current collection
#[derive(Debug, Clone, Serialize)]
pub struct ChannelFrame<'a> {
    pub channel: Channel,
    pub retention: Retention,
    /// Bumped whenever the collection changes
    pub revision: u64,
    pub particles: &'a [Particle],
}

impl<'a> From<&'a ParticleEngine> for ChannelFrame<'a> {
    fn from(engine: &'a ParticleEngine) -> Self {
        Self {
            channel: engine.config().channel,
            retention: engine.config().retention,
            revision: engine.revision(),
            particles: engine.particles(),
        }
    }
}

/// What the active screen shows
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ScreenFrame<'a> {
    Loading {
        progress: u8,
        initials_visible: bool,
        phase: LoadingPhase,
    },
    FormEntry {
        draft: &'a FormDraft,
        focused: Option<&'static str>,
        submitting: bool,
        /// Last rejected submit, until the next edit
        validation: Option<&'a ValidationError>,
    },
    Celebration {
        details: &'a UserDetails,
        message_visible: bool,
        button_visible: bool,
    },
    Main {
        details: &'a UserDetails,
        crowd_visible: bool,
        header_solid: bool,
        parallax_offset: f32,
        menu_open: bool,
        welcome_visible: bool,
        flag_opened: bool,
        play_button_visible: bool,
        fighters_visible: bool,
        playing: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    pub now_ms: u64,
    pub view: ViewState,
    pub screen: ScreenFrame<'a>,
    pub channels: Vec<ChannelFrame<'a>>,
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a AppState) -> Self {
        let (screen, channels) = match state.screen() {
            Screen::Loading(s) => (
                ScreenFrame::Loading {
                    progress: s.progress(),
                    initials_visible: s.initials_visible(),
                    phase: s.phase(),
                },
                vec![ChannelFrame::from(&s.dust)],
            ),
            Screen::FormEntry(s) => (
                ScreenFrame::FormEntry {
                    draft: s.draft(),
                    focused: s.focused().map(|f| f.as_str()),
                    submitting: s.status() == SubmitStatus::Submitting,
                    validation: s.validation_error(),
                },
                Vec::new(),
            ),
            Screen::Celebration(s) => (
                ScreenFrame::Celebration {
                    details: s.details(),
                    message_visible: s.message_visible(),
                    button_visible: s.button_visible(),
                },
                vec![ChannelFrame::from(&s.confetti)],
            ),
            Screen::Main(s) => (
                ScreenFrame::Main {
                    details: s.details(),
                    crowd_visible: s.crowd_visible(),
                    header_solid: s.page.header_solid(),
                    parallax_offset: s.page.parallax_offset(),
                    menu_open: s.page.menu_open(),
                    welcome_visible: s.page.welcome_visible(),
                    flag_opened: s.ceremony.flag_opened(),
                    play_button_visible: s.ceremony.play_button_visible(),
                    fighters_visible: s.ceremony.fighters_visible(),
                    playing: s.ceremony.playing(),
                },
                s.engines().into_iter().map(ChannelFrame::from).collect(),
            ),
        };
        Self {
            now_ms: state.now_ms(),
            view: state.view_state(),
            screen,
            channels,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
