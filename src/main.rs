//! Snow Greeting entry point
//!
//! Handles platform-specific initialization: DOM wiring and the snow loop on
//! the web, a scripted headless walkthrough natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, PageTransitionEvent};

    use snow_greeting::flow::{Cue, Outcome, Sequencer, render};
    use snow_greeting::platform::web::{self, CanvasSurface, DomView, SnowLoop};
    use snow_greeting::platform::{DrawSurface, Slot};
    use snow_greeting::{GreetingConfig, PlatformError, Snowfield};

    /// Sequencer plus the view it renders into
    struct App {
        seq: Sequencer,
        view: DomView,
        document: Document,
    }

    /// Render, play cues and hand timer requests to `setTimeout`
    fn flush(app: &Rc<RefCell<App>>) {
        let (cues, scheduled) = {
            let mut a = app.borrow_mut();
            let App { seq, view, .. } = &mut *a;
            render(seq, view);
            (seq.take_cues(), seq.take_scheduled())
        };

        {
            let a = app.borrow();
            for cue in cues {
                match cue {
                    Cue::Sparkle(i) => {
                        if let Some(el) = a.view.get(Slot::Wish(i)) {
                            if let Err(e) = web::sparkle(&a.document, el) {
                                log::warn!("Sparkle failed: {}", e);
                            }
                        }
                    }
                    Cue::PulseWish => {
                        if let Some(el) = a.view.get(Slot::WishDisplay) {
                            web::pulse(el);
                        }
                    }
                }
            }
        }

        for request in scheduled {
            let app = app.clone();
            web::after(request.delay_ms, move || {
                app.borrow_mut().seq.fire(request.task);
                flush(&app);
            });
        }
    }

    /// Apply one user event to the sequencer, then flush
    fn dispatch(app: &Rc<RefCell<App>>, event: impl FnOnce(&mut Sequencer) -> Outcome) {
        let outcome = event(&mut app.borrow_mut().seq);
        if outcome.is_applied() {
            flush(app);
        }
    }

    fn on_click(target: &Element, mut handler: impl FnMut() + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Submit whatever the field holds now, even if no `input` event fired
    fn submit(app: &Rc<RefCell<App>>, input: &HtmlInputElement) {
        let result = {
            let mut a = app.borrow_mut();
            a.seq.edit_password(&input.value());
            a.seq.submit_password()
        };
        match result {
            Ok(Outcome::Applied) => log::info!("Gate opened"),
            Ok(Outcome::Ignored) => return,
            Err(e) => log::info!("Gate stays closed: {}", e),
        }
        flush(app);
    }

    fn setup_gate(document: &Document, app: &Rc<RefCell<App>>) -> Result<(), PlatformError> {
        let input: HtmlInputElement = web::element(document, "password-input")?
            .dyn_into()
            .map_err(|_| PlatformError::WrongElementType("password-input".to_string()))?;

        // Mirror typing into the sequencer
        {
            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().seq.edit_password(&input_clone.value());
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Enter submits
        {
            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    submit(&app, &input_clone);
                }
            });
            let _ = input.add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let app = app.clone();
        on_click(&web::element(document, "password-submit")?, move || submit(&app, &input));
        Ok(())
    }

    fn setup_buttons(document: &Document, app: &Rc<RefCell<App>>) -> Result<(), PlatformError> {
        let buttons: [(&str, fn(&mut Sequencer) -> Outcome); 6] = [
            ("start-game", Sequencer::start),
            ("music-toggle", Sequencer::toggle_music),
            ("level1-next", Sequencer::advance),
            ("level2-next", Sequencer::advance),
            ("level3-next", Sequencer::advance),
            ("replay-game", Sequencer::replay),
        ];

        for (id, action) in buttons {
            let app = app.clone();
            on_click(&web::element(document, id)?, move || dispatch(&app, action));
        }

        for (i, item) in web::query_all(document, ".floating-item").iter().enumerate() {
            let app = app.clone();
            on_click(item, move || dispatch(&app, |seq| seq.select_wish(i)));
        }

        // The play button sits inside the song item, so one handler covers both
        for (i, item) in web::query_all(document, ".song-item").iter().enumerate() {
            let app = app.clone();
            on_click(item, move || dispatch(&app, |seq| seq.toggle_track(i)));
        }

        Ok(())
    }

    fn setup_resize(field: Rc<RefCell<Snowfield>>, surface: Rc<RefCell<CanvasSurface>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = web::window_size();
            surface.borrow().resize(w, h);
            field.borrow_mut().resize(w as f32, h as f32);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Page-provided wish texts and track titles take precedence over the config
    fn apply_page_content(document: &Document, config: &mut GreetingConfig) {
        let items = web::query_all(document, ".floating-item");

        // Only when every item carries a wish, so indices line up
        let wishes: Option<Vec<String>> = items
            .iter()
            .map(|el| el.get_attribute("data-wish"))
            .collect();
        match wishes.filter(|w| !w.is_empty()) {
            Some(wishes) => {
                log::info!("Using {} wishes from the page", wishes.len());
                config.wishes = wishes;
            }
            // One wish per item, or stage 2 can never complete
            None => config.fit_wishes(items.len()),
        }

        let tracks: Vec<String> = web::query_all(document, ".song-item")
            .iter()
            .enumerate()
            .map(|(i, el)| {
                el.get_attribute("data-title")
                    .unwrap_or_else(|| format!("Track {}", i + 1))
            })
            .collect();
        if !tracks.is_empty() {
            config.tracks = tracks;
        }
    }

    thread_local! {
        /// Handle to the running snow loop, stopped when the page goes away
        static SNOW: RefCell<Option<SnowLoop>> = const { RefCell::new(None) };
    }

    /// Stop the snow loop on `pagehide`, restart it if the page is restored from the bfcache
    fn setup_teardown(field: Rc<RefCell<Snowfield>>, surface: Rc<RefCell<CanvasSurface>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let hide = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            SNOW.with(|snow| {
                if let Some(snow) = snow.borrow_mut().take() {
                    snow.stop();
                }
            });
        });
        let _ = window.add_event_listener_with_callback("pagehide", hide.as_ref().unchecked_ref());
        hide.forget();

        let show = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            if !event.persisted() {
                return;
            }
            SNOW.with(|snow| {
                let mut snow = snow.borrow_mut();
                if snow.is_none() {
                    *snow = Some(SnowLoop::start(field.clone(), surface.clone()));
                    log::info!("Snowfall resumed");
                }
            });
        });
        let _ = window.add_event_listener_with_callback("pageshow", show.as_ref().unchecked_ref());
        show.forget();
    }

    pub fn run() -> Result<(), PlatformError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Snow Greeting starting...");

        let document = web::document()?;
        let mut config = GreetingConfig::load();
        apply_page_content(&document, &mut config);
        let particle_count = config.particle_count;
        let seq = Sequencer::new(config).map_err(|e| PlatformError::Config(e.to_string()))?;

        // Snowfall
        let surface = CanvasSurface::new(&document, "snowfall")?;
        let seed = js_sys::Date::now() as u64;
        let field = Snowfield::new(particle_count, surface.width(), surface.height(), seed);
        log::info!("Snowfall started with {} flakes (seed {})", field.len(), seed);
        let field = Rc::new(RefCell::new(field));
        let surface = Rc::new(RefCell::new(surface));
        setup_resize(field.clone(), surface.clone());
        setup_teardown(field.clone(), surface.clone());
        SNOW.with(|snow| *snow.borrow_mut() = Some(SnowLoop::start(field, surface)));

        // Screens
        let app = Rc::new(RefCell::new(App {
            seq,
            view: DomView::new(&document),
            document: document.clone(),
        }));
        setup_gate(&document, &app)?;
        setup_buttons(&document, &app)?;
        flush(&app);

        log::info!("Snow Greeting running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_app::run() {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snow Greeting (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    walkthrough();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play the whole greeting against a virtual clock and log what happens
#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() {
    use snow_greeting::flow::{Outcome, Screen, Sequencer, TimerQueue};
    use snow_greeting::{GreetingConfig, Snowfield};

    let config = GreetingConfig::load();
    let mut field = Snowfield::new(config.particle_count, 800.0, 600.0, 42);
    let mut seq = match Sequencer::new(config) {
        Ok(seq) => seq,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            return;
        }
    };
    let mut timers = TimerQueue::new();

    seq.edit_password("sun");
    if let Err(e) = seq.submit_password() {
        log::info!("'sun' rejected: {} ({})", e, seq.password_error());
    }
    seq.edit_password("MOON ");
    if seq.submit_password() == Ok(Outcome::Applied) {
        timers.settle(&mut seq);
    }

    seq.start();
    timers.settle(&mut seq);
    log::info!("Typed: {}", seq.typed_text());
    seq.advance();
    timers.settle(&mut seq);

    for i in 0..seq.total_wishes() {
        seq.select_wish(i);
        log::info!("Wish: {}", seq.wish_text());
    }
    timers.settle(&mut seq);
    seq.advance();
    timers.settle(&mut seq);

    seq.select_track(0);
    seq.advance();
    timers.settle(&mut seq);

    // Snow keeps falling for the whole run
    let frames = timers.now_ms() * 60 / 1000;
    for _ in 0..frames {
        field.step();
    }

    log::info!(
        "Reached {:?} after {} ms, {} flakes after {} frames",
        seq.screen(),
        timers.now_ms(),
        field.len(),
        frames
    );
    debug_assert_eq!(seq.screen(), Screen::Final);
}
