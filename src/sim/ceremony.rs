//! Flag ceremony section of the main page
//!
//! The anthem itself is played by the front-end; this tracks what the section
//! shows and what it has asked the player to do.

use serde::Serialize;

use super::timer::TimerQueue;
use crate::consts::{CEREMONY_FIGHTERS_MS, CEREMONY_PLAY_BUTTON_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CeremonyTimer {
    ShowPlayButton,
    ShowFighters,
}

/// Request for the audio player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnthemCommand {
    Play,
    Pause,
}

#[derive(Debug, Clone)]
pub struct FlagCeremony {
    flag_opened: bool,
    play_button_visible: bool,
    fighters_visible: bool,
    playing: bool,
    timers: TimerQueue<CeremonyTimer>,
}

impl Default for FlagCeremony {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagCeremony {
    pub fn new() -> Self {
        Self {
            flag_opened: false,
            play_button_visible: false,
            fighters_visible: false,
            playing: false,
            timers: TimerQueue::new(),
        }
    }

    /// Unfurl the flag (first click only)
    pub fn open_flag(&mut self, now_ms: u64) {
        if self.flag_opened {
            return;
        }
        log::info!("Flag unfurled");
        self.flag_opened = true;
        self.timers.after(now_ms, CEREMONY_PLAY_BUTTON_MS, CeremonyTimer::ShowPlayButton);
        self.timers.after(now_ms, CEREMONY_FIGHTERS_MS, CeremonyTimer::ShowFighters);
    }

    /// Play/pause button. `None` when the button is not on screen yet.
    pub fn toggle_anthem(&mut self) -> Option<AnthemCommand> {
        if !self.play_button_visible {
            log::debug!("Anthem toggle before play button shown, ignoring");
            return None;
        }
        self.playing = !self.playing;
        Some(if self.playing {
            AnthemCommand::Play
        } else {
            AnthemCommand::Pause
        })
    }

    /// Player could not start (e.g. needs a user gesture). Not retried.
    pub fn playback_failed(&mut self) {
        self.playing = false;
    }

    pub fn playback_ended(&mut self) {
        self.playing = false;
    }

    pub fn advance(&mut self, now_ms: u64) {
        while let Some((_, timer)) = self.timers.pop_due(now_ms) {
            match timer {
                CeremonyTimer::ShowPlayButton => self.play_button_visible = true,
                CeremonyTimer::ShowFighters => self.fighters_visible = true,
            }
        }
    }

    pub fn teardown(&mut self) {
        self.timers.clear();
        self.playing = false;
    }

    pub fn flag_opened(&self) -> bool {
        self.flag_opened
    }

    pub fn play_button_visible(&self) -> bool {
        self.play_button_visible
    }

    pub fn fighters_visible(&self) -> bool {
        self.fighters_visible
    }

    pub fn playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_follow_flag_open() {
        let mut c = FlagCeremony::new();
        c.advance(10_000);
        assert!(!c.play_button_visible());

        c.open_flag(10_000);
        c.advance(10_999);
        assert!(!c.play_button_visible());
        c.advance(11_000);
        assert!(c.play_button_visible());
        assert!(!c.fighters_visible());
        c.advance(12_000);
        assert!(c.fighters_visible());
    }

    #[test]
    fn test_second_open_does_not_reschedule() {
        let mut c = FlagCeremony::new();
        c.open_flag(0);
        c.open_flag(900);
        c.advance(1000);
        assert!(c.play_button_visible());
    }

    #[test]
    fn test_toggle_and_failure() {
        let mut c = FlagCeremony::new();
        assert_eq!(c.toggle_anthem(), None);

        c.open_flag(0);
        c.advance(1000);
        assert_eq!(c.toggle_anthem(), Some(AnthemCommand::Play));
        assert!(c.playing());
        c.playback_failed();
        assert!(!c.playing());
        assert_eq!(c.toggle_anthem(), Some(AnthemCommand::Play));
        assert_eq!(c.toggle_anthem(), Some(AnthemCommand::Pause));
        assert!(!c.playing());
    }

    #[test]
    fn test_teardown_cancels_reveals() {
        let mut c = FlagCeremony::new();
        c.open_flag(0);
        c.teardown();
        c.advance(5000);
        assert!(!c.play_button_visible());
        assert!(!c.fighters_visible());
    }
}
