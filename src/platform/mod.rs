//! Platform abstraction layer
//!
//! The simulator and sequencer only see these traits:
//! - `DrawSurface`: a 2D surface that can clear and fill circles
//! - `View`: text, input values and visual classes addressed by `Slot`
//!
//! The browser implementation lives in `web` (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::flow::Screen;

/// 2D drawing surface for the snowfall
pub trait DrawSurface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
}

/// Presentation element addressed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Screen(Screen),
    PasswordInput,
    PasswordError,
    MusicToggle,
    TypingText,
    Stage1Next,
    WishDisplay,
    Wish(usize),
    Stage2Next,
    TrackButton(usize),
}

/// Visual class names shared with the stylesheet
pub mod class {
    pub const ACTIVE: &str = "active";
    pub const HIDDEN: &str = "hidden";
    pub const COMPLETE: &str = "complete";
    pub const CLICKED: &str = "clicked";
    pub const PLAYING: &str = "playing";
    pub const SHAKE: &str = "shake";
}

/// Presentation surface the sequencer state is reflected into
pub trait View {
    fn set_text(&mut self, slot: Slot, text: &str);
    fn set_value(&mut self, slot: Slot, value: &str);
    fn set_class(&mut self, slot: Slot, class: &str, on: bool);
}

#[cfg(test)]
pub mod testing {
    //! Recording collaborators for tests

    use std::collections::{HashMap, HashSet};

    use super::*;

    /// Records the last text/value per slot and the live class set
    #[derive(Debug, Default)]
    pub struct RecordingView {
        pub texts: HashMap<Slot, String>,
        pub values: HashMap<Slot, String>,
        pub classes: HashSet<(Slot, String)>,
    }

    impl RecordingView {
        pub fn text(&self, slot: Slot) -> &str {
            self.texts.get(&slot).map(String::as_str).unwrap_or("")
        }

        pub fn value(&self, slot: Slot) -> &str {
            self.values.get(&slot).map(String::as_str).unwrap_or("")
        }

        pub fn has_class(&self, slot: Slot, class: &str) -> bool {
            self.classes.contains(&(slot, class.to_string()))
        }
    }

    impl View for RecordingView {
        fn set_text(&mut self, slot: Slot, text: &str) {
            self.texts.insert(slot, text.to_string());
        }

        fn set_value(&mut self, slot: Slot, value: &str) {
            self.values.insert(slot, value.to_string());
        }

        fn set_class(&mut self, slot: Slot, class: &str, on: bool) {
            let key = (slot, class.to_string());
            if on {
                self.classes.insert(key);
            } else {
                self.classes.remove(&key);
            }
        }
    }

    /// Draw call recorded by `RecordingSurface`
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum DrawCall {
        Clear,
        Circle { x: f32, y: f32, radius: f32 },
    }

    /// Fixed-size surface that records draw calls
    #[derive(Debug)]
    pub struct RecordingSurface {
        pub width: f32,
        pub height: f32,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                width,
                height,
                calls: Vec::new(),
            }
        }
    }

    impl DrawSurface for RecordingSurface {
        fn width(&self) -> f32 {
            self.width
        }

        fn height(&self) -> f32 {
            self.height
        }

        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
            self.calls.push(DrawCall::Circle { x, y, radius });
        }
    }
}
