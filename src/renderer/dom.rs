//! DOM renderer
//!
//! Applies a `Frame` to the page markup. Writes only what changed since the
//! previous frame. Particle containers are patched by `data-id` when their
//! revision moves, so elements that survive keep their CSS animation.

use std::collections::HashMap;

use web_sys::{Document, Element, HtmlElement, HtmlInputElement};
use wasm_bindgen::JsCast;

use super::markup::{ChannelPatch, container_id, plan_patch};
use crate::sim::{Channel, ChannelFrame, Field, Frame, ScreenFrame, ViewState};

const VIEWS: [ViewState; 4] = [
    ViewState::Loading,
    ViewState::FormEntry,
    ViewState::Celebration,
    ViewState::Main,
];

pub struct DomRenderer {
    document: Document,
    view: Option<ViewState>,
    /// Revision and element ids currently in each container
    rendered: HashMap<Channel, (u64, Vec<u32>)>,
    progress: Option<u8>,
}

impl DomRenderer {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            view: None,
            rendered: HashMap::new(),
            progress: None,
        }
    }

    fn el(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn set_class(&self, id: &str, class: &str, on: bool) {
        if let Some(el) = self.el(id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        self.set_class(id, "hidden", hidden);
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.el(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_style(&self, id: &str, property: &str, value: &str) {
        if let Some(el) = self.el(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            let _ = el.style().set_property(property, value);
        }
    }

    pub fn render(&mut self, frame: &Frame<'_>) {
        if self.view != Some(frame.view) {
            for view in VIEWS {
                self.set_hidden(&format!("screen-{}", view.as_str()), view != frame.view);
            }
            // Channels of the previous screen are gone
            self.rendered.clear();
            self.view = Some(frame.view);
        }

        match &frame.screen {
            ScreenFrame::Loading {
                progress,
                initials_visible,
                ..
            } => {
                if self.progress != Some(*progress) {
                    self.set_style("progress-bar", "width", &format!("{}%", progress));
                    self.set_text("progress-text", &format!("{}%", progress));
                    self.progress = Some(*progress);
                }
                self.set_class("loading-initials", "visible", *initials_visible);
            }
            ScreenFrame::FormEntry {
                focused,
                submitting,
                validation,
                ..
            } => {
                match validation {
                    Some(err) => self.set_text("form-error", &err.to_string()),
                    None => self.set_text("form-error", ""),
                }
                self.set_hidden("form-error", validation.is_none());
                for field in Field::ALL {
                    if let Some(input) = self
                        .el(field.as_str())
                        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
                    {
                        input.set_disabled(*submitting);
                    }
                    let is_focused = *focused == Some(field.as_str());
                    self.set_class(&format!("group-{}", field.as_str()), "focused", is_focused);
                }
                if let Some(btn) = self.el("submit-btn") {
                    if *submitting {
                        let _ = btn.set_attribute("disabled", "");
                    } else {
                        let _ = btn.remove_attribute("disabled");
                    }
                }
                self.set_text("submit-btn", if *submitting { "Submitting..." } else { "Submit" });
            }
            ScreenFrame::Celebration {
                details,
                message_visible,
                button_visible,
            } => {
                self.set_text("celebration-name", details.name());
                self.set_hidden("celebration-message", !message_visible);
                self.set_hidden("continue-btn", !button_visible);
            }
            ScreenFrame::Main {
                details,
                crowd_visible,
                header_solid,
                parallax_offset,
                menu_open,
                welcome_visible,
                flag_opened,
                play_button_visible,
                fighters_visible,
                playing,
            } => {
                self.set_text("welcome-name", details.name());
                self.set_text("welcome-city", details.city());
                self.set_class("hero-crowd", "visible", *crowd_visible);
                self.set_class("site-header", "scrolled", *header_solid);
                self.set_style("hero-bg", "transform", &format!("translateY({:.1}px)", parallax_offset));
                self.set_class("nav-links", "open", *menu_open);
                self.set_hidden("welcome-banner", !welcome_visible);
                self.set_class("flag", "unfurled", *flag_opened);
                self.set_hidden("play-btn", !play_button_visible);
                self.set_text("play-btn", if *playing { "Pause Anthem" } else { "Play Anthem" });
                self.set_hidden("fighters", !fighters_visible);
            }
        }

        for channel in &frame.channels {
            self.patch_channel(channel);
        }
    }

    fn patch_channel(&mut self, frame: &ChannelFrame<'_>) {
        if matches!(self.rendered.get(&frame.channel), Some((rev, _)) if *rev == frame.revision) {
            return;
        }
        let Some(container) = self.el(&container_id(frame.channel)) else {
            return;
        };

        let (revision, ids) = self.rendered.entry(frame.channel).or_default();
        match plan_patch(ids, frame) {
            ChannelPatch::Unchanged => {}
            ChannelPatch::Rebuild(html) => container.set_inner_html(&html),
            ChannelPatch::Update { remove, append } => {
                for id in remove {
                    let selector = format!(r#"[data-id="{}"]"#, id);
                    if let Ok(Some(el)) = container.query_selector(&selector) {
                        el.remove();
                    }
                }
                if !append.is_empty() {
                    if let Err(e) = container.insert_adjacent_html("beforeend", &append) {
                        log::warn!("Failed to append {} particles: {:?}", frame.channel.as_str(), e);
                    }
                }
            }
        }
        *revision = frame.revision;
        *ids = frame.particles.iter().map(|p| p.id).collect();
    }
}
