//! Application state and the view-state controller
//!
//! Each screen owns its data, timers and particle engines. Leaving a screen
//! tears it down before the next one is entered, so nothing it scheduled can
//! fire afterwards.

use serde::Serialize;

use super::ceremony::{AnthemCommand, FlagCeremony};
use super::engine::ParticleEngine;
use super::form::{FormScreen, UserDetails, ValidationError};
use super::loading::LoadingScreen;
use super::page::{PageState, Section};
use super::particle::Channel;
use super::particle::presets::*;
use super::timer::TimerQueue;
use crate::Settings;
use crate::consts::*;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ViewState {
    Loading,
    FormEntry,
    Celebration,
    Main,
}

impl ViewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::FormEntry => "form",
            ViewState::Celebration => "celebration",
            ViewState::Main => "main",
        }
    }
}

/// Notices for the presentation layer, drained each frame
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ViewChanged(ViewState),
    ValidationFailed(ValidationError),
    ScrollTo(Section),
    Anthem(AnthemCommand),
    /// Audio needs another user gesture
    PlaybackPrompt,
}

/// Success signals that move the flow forward
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    LoadingComplete,
    Submitted(UserDetails),
    Continue,
}

/// Per-channel RNG seed derived from the run seed
pub fn channel_seed(seed: u64, channel: Channel) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(channel as u64 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CelebrationTimer {
    ShowMessage,
    ShowButton,
}

/// Thank-you screen shown after a successful submission
#[derive(Debug, Clone)]
pub struct CelebrationScreen {
    details: UserDetails,
    message_visible: bool,
    button_visible: bool,
    timers: TimerQueue<CelebrationTimer>,
    pub confetti: ParticleEngine,
}

impl CelebrationScreen {
    pub fn enter(now_ms: u64, seed: u64, settings: &Settings, details: UserDetails) -> Self {
        let mut timers = TimerQueue::new();
        timers.after(now_ms, CELEBRATION_MESSAGE_MS, CelebrationTimer::ShowMessage);
        timers.after(now_ms, CELEBRATION_BUTTON_MS, CelebrationTimer::ShowButton);
        Self {
            details,
            message_visible: false,
            button_visible: false,
            timers,
            confetti: settings.engine(
                CELEBRATION_CONFETTI,
                channel_seed(seed, Channel::CelebrationConfetti),
                now_ms,
            ),
        }
    }

    pub fn advance(&mut self, now_ms: u64) {
        self.confetti.advance(now_ms);
        while let Some((_, timer)) = self.timers.pop_due(now_ms) {
            match timer {
                CelebrationTimer::ShowMessage => self.message_visible = true,
                CelebrationTimer::ShowButton => self.button_visible = true,
            }
        }
    }

    /// Continue only counts once the button is on screen
    pub fn accepts_continue(&self) -> bool {
        self.button_visible
    }

    pub fn teardown(&mut self) {
        self.timers.clear();
        self.confetti.teardown();
    }

    pub fn details(&self) -> &UserDetails {
        &self.details
    }

    pub fn message_visible(&self) -> bool {
        self.message_visible
    }

    pub fn button_visible(&self) -> bool {
        self.button_visible
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainTimer {
    ShowCrowd,
}

/// The scrollable celebration page
#[derive(Debug, Clone)]
pub struct MainScreen {
    details: UserDetails,
    crowd_visible: bool,
    timers: TimerQueue<MainTimer>,
    pub header_sparkles: ParticleEngine,
    pub hero_confetti: ParticleEngine,
    pub footer_sparkles: ParticleEngine,
    pub balloons: ParticleEngine,
    pub fireworks: ParticleEngine,
    pub page: PageState,
    pub ceremony: FlagCeremony,
}

impl MainScreen {
    pub fn enter(now_ms: u64, seed: u64, settings: &Settings, details: UserDetails) -> Self {
        let engine = |config: super::ChannelConfig| {
            settings.engine(config, channel_seed(seed, config.channel), now_ms)
        };
        let mut timers = TimerQueue::new();
        timers.after(now_ms, HERO_CROWD_MS, MainTimer::ShowCrowd);
        Self {
            details,
            crowd_visible: false,
            timers,
            header_sparkles: engine(HEADER_SPARKLES),
            hero_confetti: engine(HERO_CONFETTI),
            footer_sparkles: engine(FOOTER_SPARKLES),
            balloons: engine(BALLOONS),
            fireworks: engine(FIREWORKS),
            page: PageState::new(settings.effective_parallax()),
            ceremony: FlagCeremony::new(),
        }
    }

    pub fn engines(&self) -> [&ParticleEngine; 5] {
        [
            &self.header_sparkles,
            &self.hero_confetti,
            &self.footer_sparkles,
            &self.balloons,
            &self.fireworks,
        ]
    }

    fn engines_mut(&mut self) -> [&mut ParticleEngine; 5] {
        [
            &mut self.header_sparkles,
            &mut self.hero_confetti,
            &mut self.footer_sparkles,
            &mut self.balloons,
            &mut self.fireworks,
        ]
    }

    pub fn advance(&mut self, now_ms: u64) {
        for engine in self.engines_mut() {
            engine.advance(now_ms);
        }
        self.ceremony.advance(now_ms);
        while let Some((_, MainTimer::ShowCrowd)) = self.timers.pop_due(now_ms) {
            self.crowd_visible = true;
        }
    }

    pub fn teardown(&mut self) {
        self.timers.clear();
        for engine in self.engines_mut() {
            engine.teardown();
        }
        self.ceremony.teardown();
    }

    pub fn details(&self) -> &UserDetails {
        &self.details
    }

    pub fn crowd_visible(&self) -> bool {
        self.crowd_visible
    }
}

/// The active screen with its own data. `Celebration` and `Main` cannot
/// exist without submitted details.
#[derive(Debug, Clone)]
pub enum Screen {
    Loading(LoadingScreen),
    FormEntry(FormScreen),
    Celebration(CelebrationScreen),
    Main(MainScreen),
}

impl Screen {
    pub fn view_state(&self) -> ViewState {
        match self {
            Screen::Loading(_) => ViewState::Loading,
            Screen::FormEntry(_) => ViewState::FormEntry,
            Screen::Celebration(_) => ViewState::Celebration,
            Screen::Main(_) => ViewState::Main,
        }
    }

    fn teardown(&mut self) {
        match self {
            Screen::Loading(s) => s.teardown(),
            Screen::FormEntry(s) => s.teardown(),
            Screen::Celebration(s) => s.teardown(),
            Screen::Main(s) => s.teardown(),
        }
    }
}

/// Complete application state (deterministic for a given seed and input trace)
#[derive(Debug, Clone)]
pub struct AppState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    /// Simulated clock
    pub(crate) now_ms: u64,
    pub(crate) screen: Screen,
    /// Outbound notices since the last drain
    pub events: Vec<AppEvent>,
}

impl AppState {
    /// Start a session on the loading screen
    pub fn new(seed: u64, settings: Settings) -> Self {
        let screen = Screen::Loading(LoadingScreen::enter(
            0,
            channel_seed(seed, Channel::LoadingDust),
            &settings,
        ));
        Self {
            seed,
            settings,
            now_ms: 0,
            screen,
            events: Vec::new(),
        }
    }

    pub fn view_state(&self) -> ViewState {
        self.screen.view_state()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Submitted details, once past the form
    pub fn details(&self) -> Option<&UserDetails> {
        match &self.screen {
            Screen::Celebration(s) => Some(s.details()),
            Screen::Main(s) => Some(s.details()),
            _ => None,
        }
    }

    /// Commit a transition. Only the successor of the current screen is
    /// accepted; anything else is logged and dropped.
    pub fn apply(&mut self, transition: Transition) -> bool {
        let now = self.now_ms;
        let next = match (&self.screen, transition) {
            (Screen::Loading(_), Transition::LoadingComplete) => Screen::FormEntry(FormScreen::enter()),
            (Screen::FormEntry(_), Transition::Submitted(details)) => {
                Screen::Celebration(CelebrationScreen::enter(now, self.seed, &self.settings, details))
            }
            (Screen::Celebration(s), Transition::Continue) => Screen::Main(MainScreen::enter(
                now,
                self.seed,
                &self.settings,
                s.details().clone(),
            )),
            (screen, transition) => {
                log::warn!(
                    "Rejected transition {:?} from {}",
                    transition,
                    screen.view_state().as_str()
                );
                return false;
            }
        };

        let from = self.screen.view_state();
        self.screen.teardown();
        self.screen = next;
        let to = self.screen.view_state();
        log::info!("View {} -> {} at {}ms", from.as_str(), to.as_str(), now);
        self.events.push(AppEvent::ViewChanged(to));
        true
    }

    /// Take pending notices
    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::form::FormDraft;

    fn details() -> UserDetails {
        FormDraft {
            name: "Asha".into(),
            phone: "9999999999".into(),
            email: "a@b.com".into(),
            city: "Delhi".into(),
            age: "30".into(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_transitions_follow_order() {
        let mut state = AppState::new(1, Settings::default());
        assert_eq!(state.view_state(), ViewState::Loading);

        // Out-of-order signals are rejected
        assert!(!state.apply(Transition::Continue));
        assert!(!state.apply(Transition::Submitted(details())));
        assert_eq!(state.view_state(), ViewState::Loading);

        assert!(state.apply(Transition::LoadingComplete));
        assert!(!state.apply(Transition::LoadingComplete));
        assert!(state.apply(Transition::Submitted(details())));
        assert_eq!(state.details().unwrap().name(), "Asha");
        assert!(state.apply(Transition::Continue));
        assert_eq!(state.view_state(), ViewState::Main);

        // Main is terminal
        assert!(!state.apply(Transition::Continue));
        assert!(!state.apply(Transition::LoadingComplete));
        assert_eq!(state.view_state(), ViewState::Main);

        let views: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::ViewChanged(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(views, vec![ViewState::FormEntry, ViewState::Celebration, ViewState::Main]);
    }

    #[test]
    fn test_main_activates_global_channels() {
        let mut main = MainScreen::enter(0, 1, &Settings::default(), details());
        assert!(main.fireworks.is_active());
        assert_eq!(main.balloons.particles().len(), 6);
        assert_eq!(main.header_sparkles.particles().len(), 15);
        assert_eq!(main.hero_confetti.particles().len(), 30);
        assert_eq!(main.footer_sparkles.particles().len(), 12);

        main.advance(499);
        assert!(!main.crowd_visible());
        main.advance(500);
        assert!(main.crowd_visible());
    }

    #[test]
    fn test_celebration_reveals() {
        let mut c = CelebrationScreen::enter(1000, 1, &Settings::default(), details());
        assert_eq!(c.confetti.particles().len(), 20);
        assert!(!c.accepts_continue());
        c.advance(1500);
        assert!(c.message_visible());
        assert!(!c.button_visible());
        c.advance(3000);
        assert!(c.accepts_continue());
    }

    #[test]
    fn test_channel_seeds_differ() {
        assert_ne!(
            channel_seed(5, Channel::HeaderSparkles),
            channel_seed(5, Channel::FooterSparkles)
        );
    }
}
