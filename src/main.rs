//! Tricolor Fest entry point
//!
//! Handles platform-specific initialization and runs the page loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Element, Event, HtmlInputElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions,
    };

    use tricolor_fest::Settings;
    use tricolor_fest::audio::{AnthemPlayer, PlaybackError};
    use tricolor_fest::consts::MAX_FRAME_MS;
    use tricolor_fest::renderer::DomRenderer;
    use tricolor_fest::sim::{
        AnthemCommand, AppEvent, AppState, Field, Frame, Pointer, Section, TickInput, UiEvent,
        ViewState, tick,
    };

    const PLAYBACK_PROMPT: &str = "Please turn on volume and click again to play the audio!";

    /// Page instance holding all state
    struct App {
        state: AppState,
        renderer: DomRenderer,
        input: TickInput,
        last_time: f64,
        /// Lives exactly as long as the main screen
        anthem: Option<AnthemPlayer>,
        /// Shown once the `App` borrow is released; `alert` blocks and the
        /// browser may dispatch events (blur) while it is open
        alerts: Vec<String>,
    }

    impl App {
        fn new(seed: u64, settings: Settings, renderer: DomRenderer) -> Self {
            Self {
                state: AppState::new(seed, settings),
                renderer,
                input: TickInput::default(),
                last_time: 0.0,
                anthem: None,
                alerts: Vec::new(),
            }
        }

        fn push(&mut self, event: UiEvent) {
            self.input.events.push(event);
        }

        /// Apply queued input without advancing time. Runs inside the
        /// triggering event handler so audio starts within the user gesture.
        fn flush(&mut self) {
            self.step(0);
        }

        fn step(&mut self, dt_ms: u64) {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt_ms);
            for event in self.state.drain_events() {
                self.handle(event);
            }
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time).max(0.0) as u64).min(MAX_FRAME_MS)
            } else {
                0
            };
            self.last_time = time;

            if let Some(anthem) = self.anthem.as_mut() {
                if let Err(e) = anthem.check_resumed() {
                    log::warn!("Anthem playback failed: {}", e);
                    self.input.events.push(UiEvent::PlaybackFailed);
                } else if anthem.finished() {
                    anthem.acknowledge_end();
                    self.input.events.push(UiEvent::PlaybackEnded);
                }
            }
            self.step(dt);
        }

        fn handle(&mut self, event: AppEvent) {
            match event {
                AppEvent::ViewChanged(ViewState::Main) => {
                    self.anthem = Some(AnthemPlayer::acquire(self.state.settings.master_volume));
                }
                AppEvent::ViewChanged(_) => self.anthem = None,
                AppEvent::ValidationFailed(e) => self.alerts.push(e.to_string()),
                AppEvent::ScrollTo(section) => scroll_to(section),
                AppEvent::Anthem(AnthemCommand::Play) => {
                    let result = self
                        .anthem
                        .as_mut()
                        .ok_or(PlaybackError::ContextUnavailable)
                        .and_then(|anthem| anthem.play());
                    if let Err(e) = result {
                        log::warn!("Anthem playback failed: {}", e);
                        self.push(UiEvent::PlaybackFailed);
                        self.flush();
                    }
                }
                AppEvent::Anthem(AnthemCommand::Pause) => {
                    if let Some(anthem) = self.anthem.as_mut() {
                        anthem.pause();
                    }
                }
                AppEvent::PlaybackPrompt => self.alerts.push(PLAYBACK_PROMPT.to_string()),
            }
        }

        fn render(&mut self) {
            let frame = Frame::capture(&self.state);
            self.renderer.render(&frame);
        }
    }

    fn show_alerts(alerts: Vec<String>) {
        let Some(window) = web_sys::window() else { return };
        for message in alerts {
            let _ = window.alert_with_message(&message);
        }
    }

    fn scroll_to(section: Section) {
        let target = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(section.as_str()));
        if let Some(el) = target {
            let opts = ScrollIntoViewOptions::new();
            opts.set_behavior(ScrollBehavior::Smooth);
            el.scroll_into_view_with_scroll_into_view_options(&opts);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tricolor Fest starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let app = Rc::new(RefCell::new(App::new(
            seed,
            settings,
            DomRenderer::new(document),
        )));

        log::info!("Page initialized with seed: {}", seed);

        setup_form_handlers(&app);
        setup_celebration_handlers(&app);
        setup_main_handlers(&app);

        // First paint before the loop starts
        app.borrow_mut().render();
        request_animation_frame(app);

        log::info!("Tricolor Fest running!");
    }

    /// Forward DOM events on element `id` into the simulation
    fn listen(app: &Rc<RefCell<App>>, id: &str, kind: &str, make: fn(&Event) -> Option<UiEvent>) {
        let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            log::warn!("Missing element #{}", id);
            return;
        };
        listen_on(app, &el, kind, make);
    }

    fn listen_on(app: &Rc<RefCell<App>>, el: &Element, kind: &str, make: fn(&Event) -> Option<UiEvent>) {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
            let Some(ui) = make(&event) else { return };
            let alerts = {
                let mut app = app.borrow_mut();
                app.push(ui);
                app.flush();
                app.render();
                std::mem::take(&mut app.alerts)
            };
            show_alerts(alerts);
        });
        let _ = el.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn event_field(event: &Event) -> Option<(Field, HtmlInputElement)> {
        let input: HtmlInputElement = event.target()?.dyn_into().ok()?;
        Some((Field::from_str(&input.id())?, input))
    }

    fn setup_form_handlers(app: &Rc<RefCell<App>>) {
        for field in Field::ALL {
            listen(app, field.as_str(), "input", |event| {
                let (field, input) = event_field(event)?;
                Some(UiEvent::FieldChanged {
                    field,
                    value: input.value(),
                })
            });
            listen(app, field.as_str(), "focus", |event| {
                event_field(event).map(|(field, _)| UiEvent::FieldFocused(Some(field)))
            });
            listen(app, field.as_str(), "blur", |_| Some(UiEvent::FieldFocused(None)));
        }

        listen(app, "user-form", "submit", |event| {
            event.prevent_default();
            Some(UiEvent::Submit)
        });
    }

    fn setup_celebration_handlers(app: &Rc<RefCell<App>>) {
        listen(app, "continue-btn", "click", |_| Some(UiEvent::Continue));
    }

    fn setup_main_handlers(app: &Rc<RefCell<App>>) {
        // Anywhere on the page; the overlay spans the viewport
        listen(app, "screen-main", "click", |event| {
            let mouse: &MouseEvent = event.dyn_ref()?;
            let overlay = web_sys::window()?.document()?.get_element_by_id("fx-fireworks")?;
            let rect = overlay.get_bounding_client_rect();
            Some(UiEvent::Click(Pointer::new(
                Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
                Vec2::new(rect.width() as f32, rect.height() as f32),
            )))
        });

        listen(app, "menu-toggle", "click", |_| Some(UiEvent::ToggleMenu));
        listen(app, "welcome-close", "click", |_| Some(UiEvent::DismissWelcome));
        listen(app, "flag", "click", |_| Some(UiEvent::OpenFlag));
        listen(app, "play-btn", "click", |_| Some(UiEvent::ToggleAnthem));

        // Nav links carry their section in data-section
        let links = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector_all("[data-section]").ok());
        if let Some(links) = links {
            for i in 0..links.length() {
                let Some(el) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                listen_on(app, &el, "click", |event| {
                    event.prevent_default();
                    let el: Element = event.current_target()?.dyn_into().ok()?;
                    let section = Section::from_str(&el.get_attribute("data-section")?)?;
                    Some(UiEvent::Navigate(section))
                });
            }
        }

        // Scroll position, read on the window
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                if let Some(y) = web_sys::window().and_then(|w| w.scroll_y().ok()) {
                    app.borrow_mut().push(UiEvent::Scrolled(y as f32));
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            page_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn page_loop(app: Rc<RefCell<App>>, time: f64) {
        let alerts = {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            std::mem::take(&mut a.alerts)
        };
        show_alerts(alerts);

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tricolor Fest (native) starting...");
    log::info!("Native mode runs a scripted headless session - use `trunk serve` for the page");

    if let Err(e) = headless_session() {
        log::error!("Frame serialization failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk the whole flow on the simulated clock and print the final frame
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() -> Result<(), serde_json::Error> {
    use glam::Vec2;
    use tricolor_fest::Settings;
    use tricolor_fest::consts::SIM_DT_MS;
    use tricolor_fest::sim::{AppState, Field, Frame, Pointer, Section, TickInput, UiEvent, ViewState, tick};

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or(2024);
    let mut state = AppState::new(seed, settings);

    fn run_until(state: &mut AppState, events: Vec<UiEvent>, ms: u64) {
        tick(state, &TickInput { events }, SIM_DT_MS);
        for _ in 1..ms / SIM_DT_MS {
            tick(state, &TickInput::default(), SIM_DT_MS);
        }
        for event in state.drain_events() {
            log::info!("{:?}", event);
        }
    }

    run_until(&mut state, Vec::new(), 3300);

    let form: Vec<UiEvent> = [
        (Field::Name, "Asha"),
        (Field::Phone, "9876543210"),
        (Field::Email, "asha@example.com"),
        (Field::City, "Pune"),
        (Field::Age, "29"),
    ]
    .into_iter()
    .map(|(field, value)| UiEvent::FieldChanged {
        field,
        value: value.to_string(),
    })
    .chain(std::iter::once(UiEvent::Submit))
    .collect();
    run_until(&mut state, form, 2000);
    run_until(&mut state, Vec::new(), 2000);
    run_until(&mut state, vec![UiEvent::Continue], 1000);

    let click = Pointer::new(Vec2::new(320.0, 180.0), Vec2::ZERO, Vec2::new(640.0, 360.0));
    run_until(
        &mut state,
        vec![
            UiEvent::Click(click),
            UiEvent::Scrolled(240.0),
            UiEvent::Navigate(Section::Ceremony),
            UiEvent::OpenFlag,
        ],
        300,
    );

    let frame = Frame::capture(&state);
    if frame.view != ViewState::Main {
        log::warn!("Session ended on {} instead of main", frame.view.as_str());
    }
    println!("{}", frame.to_json()?);
    Ok(())
}
