//! Browser implementations of the platform traits
//!
//! Canvas 2D drawing, DOM-backed view, `setTimeout` continuations and the
//! `requestAnimationFrame` snow loop.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement};

use super::{DrawSurface, Slot, View};
use crate::consts::SPARKLE_MS;
use crate::error::PlatformError;
use crate::flow::Screen;
use crate::sim::Snowfield;

const FLAKE_FILL: &str = "rgba(255, 255, 255, 0.8)";

pub fn document() -> Result<Document, PlatformError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(PlatformError::NoDocument)
}

pub fn element(document: &Document, id: &str) -> Result<Element, PlatformError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| PlatformError::MissingElement(id.to_string()))
}

/// All elements matching `selector`, in document order
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn js_error(value: JsValue) -> PlatformError {
    PlatformError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Run `f` once after `delay_ms`
pub fn after(delay_ms: u32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window, dropping timer");
        return;
    };
    let closure = Closure::once(f);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        delay_ms.min(i32::MAX as u32) as i32,
    );
    closure.forget();
}

/// Window inner size in CSS pixels
pub fn window_size() -> (u32, u32) {
    let Some(window) = web_sys::window() else {
        return (0, 0);
    };
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    (dim(window.inner_width()), dim(window.inner_height()))
}

// === Drawing ===

/// Full-window canvas with a 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(document: &Document, id: &str) -> Result<Self, PlatformError> {
        let canvas: HtmlCanvasElement = element(document, id)?
            .dyn_into()
            .map_err(|_| PlatformError::WrongElementType(id.to_string()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or(PlatformError::NoContext)?
            .dyn_into()
            .map_err(|_| PlatformError::NoContext)?;

        let surface = Self { canvas, ctx };
        let (w, h) = window_size();
        surface.resize(w, h);
        Ok(surface)
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.width() as f64, self.height() as f64);
        // Resizing resets context state, so set the fill every frame
        self.ctx.set_fill_style_str(FLAKE_FILL);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            x as f64,
            y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }
}

/// Handle to the running snowfall animation
pub struct SnowLoop {
    running: Rc<Cell<bool>>,
}

impl SnowLoop {
    /// Start drawing `field` onto `surface` every animation frame
    pub fn start(field: Rc<RefCell<Snowfield>>, surface: Rc<RefCell<CanvasSurface>>) -> Self {
        let running = Rc::new(Cell::new(true));
        request_frame(field, surface, running.clone());
        Self { running }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Stop after the frame in flight
    pub fn stop(&self) {
        if self.running.replace(false) {
            log::info!("Snow loop stopped");
        }
    }
}

fn request_frame(
    field: Rc<RefCell<Snowfield>>,
    surface: Rc<RefCell<CanvasSurface>>,
    running: Rc<Cell<bool>>,
) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |_time: f64| {
        if !running.get() {
            return;
        }
        field.borrow_mut().frame(&mut *surface.borrow_mut());
        request_frame(field, surface, running);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

// === View ===

/// View over the greeting's DOM elements
pub struct DomView {
    slots: HashMap<Slot, Element>,
}

impl DomView {
    /// Resolve every slot. Missing elements are logged and skipped.
    pub fn new(document: &Document) -> Self {
        let mut slots = HashMap::new();

        let by_id = [
            (Slot::PasswordInput, "password-input"),
            (Slot::PasswordError, "password-error"),
            (Slot::MusicToggle, "music-toggle"),
            (Slot::TypingText, "typing-text"),
            (Slot::Stage1Next, "level1-next"),
            (Slot::WishDisplay, "wish-display"),
            (Slot::Stage2Next, "level2-next"),
        ];
        let screens = Screen::ALL.map(|s| (Slot::Screen(s), s.element_id()));

        for (slot, id) in by_id.into_iter().chain(screens) {
            match element(document, id) {
                Ok(el) => {
                    slots.insert(slot, el);
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        for (i, el) in query_all(document, ".floating-item").into_iter().enumerate() {
            slots.insert(Slot::Wish(i), el);
        }
        for (i, el) in query_all(document, ".play-button").into_iter().enumerate() {
            slots.insert(Slot::TrackButton(i), el);
        }

        Self { slots }
    }

    pub fn get(&self, slot: Slot) -> Option<&Element> {
        self.slots.get(&slot)
    }
}

impl View for DomView {
    fn set_text(&mut self, slot: Slot, text: &str) {
        if let Some(el) = self.slots.get(&slot) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_value(&mut self, slot: Slot, value: &str) {
        if let Some(input) = self.slots.get(&slot).and_then(|el| el.dyn_ref::<HtmlInputElement>()) {
            if input.value() != value {
                input.set_value(value);
            }
        }
    }

    fn set_class(&mut self, slot: Slot, class: &str, on: bool) {
        if let Some(el) = self.slots.get(&slot) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }
}

// === Cues ===

/// Float a sparkle over `target` and remove it after a second
pub fn sparkle(document: &Document, target: &Element) -> Result<(), PlatformError> {
    let rect = target.get_bounding_client_rect();
    let sparkle: HtmlElement = document
        .create_element("div")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| PlatformError::WrongElementType("div".to_string()))?;

    sparkle.set_text_content(Some("✨"));
    let style = sparkle.style();
    let left = format!("{}px", rect.left() + rect.width() / 2.0);
    let top = format!("{}px", rect.top() + rect.height() / 2.0);
    for (name, value) in [
        ("position", "fixed"),
        ("left", left.as_str()),
        ("top", top.as_str()),
        ("font-size", "2rem"),
        ("pointer-events", "none"),
        ("z-index", "1000"),
        ("animation", "sparkleFloat 1s ease-out forwards"),
    ] {
        style.set_property(name, value).map_err(js_error)?;
    }

    document
        .body()
        .ok_or(PlatformError::NoDocument)?
        .append_child(&sparkle)
        .map_err(js_error)?;

    after(SPARKLE_MS, move || sparkle.remove());
    Ok(())
}

/// Restart the pulse animation on `target`
pub fn pulse(target: &Element) {
    let Some(el) = target.dyn_ref::<HtmlElement>() else {
        return;
    };
    let _ = el.style().set_property("animation", "none");
    let el = el.clone();
    after(10, move || {
        let _ = el.style().set_property("animation", "pulse 0.5s ease");
    });
}
