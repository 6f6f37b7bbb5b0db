//! Scroll position and section navigation on the main page

use serde::{Deserialize, Serialize};

use crate::consts::{HEADER_SCROLL_THRESHOLD, PARALLAX_SPEED};

/// Anchored sections, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Home,
    Celebration,
    Ceremony,
    About,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Home, Section::Celebration, Section::Ceremony, Section::About];

    /// Anchor id
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Celebration => "celebration",
            Section::Ceremony => "ceremony",
            Section::About => "about",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|sec| sec.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageState {
    scroll_y: f32,
    parallax: bool,
    menu_open: bool,
    welcome_visible: bool,
}

impl PageState {
    pub fn new(parallax: bool) -> Self {
        Self {
            scroll_y: 0.0,
            parallax,
            menu_open: false,
            welcome_visible: true,
        }
    }

    pub fn scrolled_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    /// Header switches to its solid style past the threshold
    pub fn header_solid(&self) -> bool {
        self.scroll_y > HEADER_SCROLL_THRESHOLD
    }

    /// Vertical translation for parallax layers (px)
    pub fn parallax_offset(&self) -> f32 {
        if self.parallax {
            -(self.scroll_y * PARALLAX_SPEED)
        } else {
            0.0
        }
    }

    /// Jump to a section. Closes the mobile menu.
    pub fn navigate(&mut self, section: Section) -> Section {
        self.menu_open = false;
        section
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn dismiss_welcome(&mut self) {
        self.welcome_visible = false;
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn welcome_visible(&self) -> bool {
        self.welcome_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_threshold() {
        let mut page = PageState::new(true);
        page.scrolled_to(50.0);
        assert!(!page.header_solid());
        page.scrolled_to(51.0);
        assert!(page.header_solid());
    }

    #[test]
    fn test_parallax_offset() {
        let mut page = PageState::new(true);
        page.scrolled_to(200.0);
        assert_eq!(page.parallax_offset(), -100.0);

        let mut still = PageState::new(false);
        still.scrolled_to(200.0);
        assert_eq!(still.parallax_offset(), 0.0);
    }

    #[test]
    fn test_navigate_closes_menu() {
        let mut page = PageState::new(true);
        page.toggle_menu();
        assert!(page.menu_open());
        assert_eq!(page.navigate(Section::About), Section::About);
        assert!(!page.menu_open());
    }

    #[test]
    fn test_section_ids() {
        for s in Section::ALL {
            assert_eq!(Section::from_str(s.as_str()), Some(s));
        }
    }
}
