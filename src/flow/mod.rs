//! Screen flow
//!
//! The sequencer is a plain state object:
//! - User events and timer continuations are the only way in
//! - Delays are requested, never awaited (`Scheduled` outbox)
//! - Presentation is derived from state by `render`

pub mod render;
pub mod reveal;
pub mod schedule;
pub mod screen;
pub mod sequencer;

pub use render::render;
pub use reveal::{Reveal, RevealPhase, RevealStep};
pub use schedule::{Scheduled, Task, TimerQueue};
pub use screen::Screen;
pub use sequencer::{Cue, Outcome, Sequencer};
