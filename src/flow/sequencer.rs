//! Screen sequencer
//!
//! Owns every piece of session state. User events come in through the
//! transition methods, timer continuations through `fire`. A transition
//! finishes all of its mutations before returning, so any task it scheduled
//! observes the post-transition state.

use super::reveal::{Reveal, RevealStep};
use super::schedule::{Scheduled, Task};
use super::screen::Screen;
use crate::config::GreetingConfig;
use crate::error::{ConfigError, GateError};
use crate::normalize_secret;

/// Whether an event changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Wrong screen, switch in flight, bad index or already done
    Ignored,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        *self == Outcome::Applied
    }
}

/// Transient presentation effect with no lasting state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Float a sparkle over wish item `i`
    Sparkle(usize),
    /// Restart the wish display pulse
    PulseWish,
}

/// Stage 2 selection state for one cycle
#[derive(Debug, Clone)]
struct WishBoard {
    selected: Vec<bool>,
    revealed: usize,
    /// Text of the most recently selected wish
    shown: String,
    /// Bumped on every reset so delayed reveals from an old cycle are dropped
    cycle: u32,
    next_visible: bool,
}

impl WishBoard {
    fn new(total: usize) -> Self {
        Self {
            selected: vec![false; total],
            revealed: 0,
            shown: String::new(),
            cycle: 0,
            next_visible: false,
        }
    }

    fn all_revealed(&self) -> bool {
        self.revealed == self.selected.len()
    }

    fn reset(&mut self) {
        self.selected.fill(false);
        self.revealed = 0;
        self.shown.clear();
        self.cycle = self.cycle.wrapping_add(1);
        self.next_visible = false;
    }
}

/// The greeting state machine
#[derive(Debug, Clone)]
pub struct Sequencer {
    config: GreetingConfig,

    /// Current screen (updated when a switch completes)
    screen: Screen,
    /// Target of an in-flight switch; all screens are hidden meanwhile
    switching_to: Option<Screen>,

    // === Gate ===
    password_input: String,
    password_error: String,
    shaking: bool,
    shake_serial: u32,

    // === Landing ===
    music_enabled: bool,

    // === Stage 1 ===
    reveal: Reveal,
    stage1_next_visible: bool,

    // === Stage 2 ===
    wishes: WishBoard,

    // === Stage 3 ===
    playing: Option<usize>,

    scheduled: Vec<Scheduled>,
    cues: Vec<Cue>,
}

impl Sequencer {
    /// Validates `config` first, so the gate can never open on empty input
    pub fn new(config: GreetingConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        Ok(Self {
            screen: Screen::Gate,
            switching_to: None,
            password_input: String::new(),
            password_error: String::new(),
            shaking: false,
            shake_serial: 0,
            music_enabled: false,
            reveal: Reveal::new(config.message.clone()),
            stage1_next_visible: false,
            wishes: WishBoard::new(config.total_wishes()),
            playing: None,
            scheduled: Vec::new(),
            cues: Vec::new(),
            config,
        })
    }

    // === Queries ===

    pub fn config(&self) -> &GreetingConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Screen currently shown, `None` while a switch is in flight
    pub fn visible_screen(&self) -> Option<Screen> {
        match self.switching_to {
            Some(_) => None,
            None => Some(self.screen),
        }
    }

    pub fn is_switching(&self) -> bool {
        self.switching_to.is_some()
    }

    pub fn password_input(&self) -> &str {
        &self.password_input
    }

    pub fn password_error(&self) -> &str {
        &self.password_error
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn typed_text(&self) -> &str {
        self.reveal.text()
    }

    pub fn reveal_complete(&self) -> bool {
        self.reveal.is_complete()
    }

    pub fn stage1_next_visible(&self) -> bool {
        self.stage1_next_visible
    }

    pub fn total_wishes(&self) -> usize {
        self.wishes.selected.len()
    }

    pub fn revealed_count(&self) -> usize {
        self.wishes.revealed
    }

    pub fn wish_selected(&self, index: usize) -> bool {
        self.wishes.selected.get(index).copied().unwrap_or(false)
    }

    pub fn wish_text(&self) -> &str {
        &self.wishes.shown
    }

    pub fn stage2_next_visible(&self) -> bool {
        self.wishes.next_visible
    }

    pub fn track_count(&self) -> usize {
        self.config.tracks.len()
    }

    pub fn playing_track(&self) -> Option<usize> {
        self.playing
    }

    /// Drain timer requests produced since the last call
    pub fn take_scheduled(&mut self) -> Vec<Scheduled> {
        std::mem::take(&mut self.scheduled)
    }

    /// Drain transient cues produced since the last call
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    // === Internals ===

    fn after(&mut self, delay_ms: u32, task: Task) {
        self.scheduled.push(Scheduled::after(delay_ms, task));
    }

    /// True if `screen` is current and no switch is in flight
    fn accepting(&self, screen: Screen) -> bool {
        self.switching_to.is_none() && self.screen == screen
    }

    /// Hide the current screen now, show `target` after the switch delay
    fn switch_to(&mut self, target: Screen) {
        log::info!("Switching {:?} -> {:?}", self.screen, target);
        self.switching_to = Some(target);
        self.after(self.config.switch_delay_ms, Task::ShowScreen(target));
    }

    fn reveal_next(&mut self, generation: u32) {
        match self.reveal.step(generation) {
            RevealStep::Typed(_) => {
                self.after(self.config.reveal_delay_ms, Task::RevealNext { generation });
            }
            RevealStep::Finished => {
                log::info!("Message reveal complete");
                self.after(
                    self.config.reveal_advance_delay_ms,
                    Task::RevealAdvance { generation },
                );
            }
            RevealStep::Stale => {}
        }
    }

    // === Transitions ===

    /// Mirror the password field contents
    pub fn edit_password(&mut self, value: &str) -> Outcome {
        if !self.accepting(Screen::Gate) {
            return Outcome::Ignored;
        }
        self.password_input.clear();
        self.password_input.push_str(value);
        Outcome::Applied
    }

    /// Check the password field against the secret.
    ///
    /// A mismatch shows the error, clears the field and shakes it; the gate
    /// stays open for another try.
    pub fn submit_password(&mut self) -> Result<Outcome, GateError> {
        if !self.accepting(Screen::Gate) {
            return Ok(Outcome::Ignored);
        }

        if normalize_secret(&self.password_input) == self.config.secret {
            self.password_error.clear();
            self.switch_to(Screen::Landing);
            return Ok(Outcome::Applied);
        }

        log::warn!("Incorrect password attempt");
        self.password_error = self.config.error_message.clone();
        self.password_input.clear();
        self.shaking = true;
        self.shake_serial = self.shake_serial.wrapping_add(1);
        self.after(
            self.config.shake_ms,
            Task::EndShake {
                serial: self.shake_serial,
            },
        );
        Err(GateError::Mismatch)
    }

    pub fn toggle_music(&mut self) -> Outcome {
        if !self.accepting(Screen::Landing) {
            return Outcome::Ignored;
        }
        self.music_enabled = !self.music_enabled;
        log::info!("Music {}", if self.music_enabled { "on" } else { "off" });
        Outcome::Applied
    }

    /// Leave the landing screen and start typing the message
    pub fn start(&mut self) -> Outcome {
        if !self.accepting(Screen::Landing) {
            return Outcome::Ignored;
        }
        self.switch_to(Screen::Stage1);
        self.stage1_next_visible = false;
        let generation = self.reveal.restart();
        self.reveal_next(generation);
        Outcome::Applied
    }

    /// Stage "next" button
    pub fn advance(&mut self) -> Outcome {
        if self.is_switching() {
            return Outcome::Ignored;
        }

        match self.screen {
            Screen::Stage1 if self.reveal.is_complete() => {
                self.switch_to(Screen::Stage2);
            }
            Screen::Stage2 if self.wishes.all_revealed() => {
                self.switch_to(Screen::Stage3);
                self.wishes.reset();
            }
            Screen::Stage3 => {
                self.switch_to(Screen::Final);
            }
            _ => return Outcome::Ignored,
        }
        Outcome::Applied
    }

    /// Reveal wish `index`. Selecting an already revealed wish is a no-op.
    pub fn select_wish(&mut self, index: usize) -> Outcome {
        if !self.accepting(Screen::Stage2) || self.wishes.selected.get(index) != Some(&false) {
            return Outcome::Ignored;
        }

        self.wishes.selected[index] = true;
        self.wishes.revealed += 1;
        self.wishes.shown.clone_from(&self.config.wishes[index]);
        self.cues.push(Cue::Sparkle(index));
        self.cues.push(Cue::PulseWish);
        log::debug!(
            "Wish {} revealed ({}/{})",
            index,
            self.wishes.revealed,
            self.total_wishes()
        );

        if self.wishes.all_revealed() {
            self.after(
                self.config.wish_advance_delay_ms,
                Task::WishesAdvance {
                    cycle: self.wishes.cycle,
                },
            );
        }
        Outcome::Applied
    }

    /// Mark track `index` as the only one playing
    pub fn select_track(&mut self, index: usize) -> Outcome {
        if !self.accepting(Screen::Stage3) || index >= self.track_count() {
            return Outcome::Ignored;
        }
        self.playing = Some(index);
        log::info!("Playing track {}: {}", index, self.config.tracks[index]);
        Outcome::Applied
    }

    /// Play button: stop track `index` if it is playing, otherwise select it
    pub fn toggle_track(&mut self, index: usize) -> Outcome {
        if self.accepting(Screen::Stage3) && self.playing == Some(index) {
            self.playing = None;
            log::info!("Stopped track {}", index);
            return Outcome::Applied;
        }
        self.select_track(index)
    }

    /// Back to the landing screen with every per-screen state reset
    pub fn replay(&mut self) -> Outcome {
        if !self.accepting(Screen::Final) {
            return Outcome::Ignored;
        }

        self.switch_to(Screen::Landing);

        self.password_input.clear();
        self.password_error.clear();
        self.shaking = false;
        self.shake_serial = self.shake_serial.wrapping_add(1);

        self.reveal.cancel();
        self.stage1_next_visible = false;

        self.wishes.reset();
        self.playing = None;

        log::info!("Replay: session state reset");
        Outcome::Applied
    }

    /// Run a timer continuation. Tasks that no longer apply are dropped.
    pub fn fire(&mut self, task: Task) {
        match task {
            Task::ShowScreen(target) => {
                if self.switching_to == Some(target) {
                    self.switching_to = None;
                    self.screen = target;
                    log::info!("Screen {:?} active", target);
                }
            }
            Task::RevealNext { generation } => self.reveal_next(generation),
            Task::RevealAdvance { generation } => {
                if self.reveal.is_current(generation) && self.reveal.is_complete() {
                    self.stage1_next_visible = true;
                }
            }
            Task::WishesAdvance { cycle } => {
                if cycle == self.wishes.cycle && self.wishes.all_revealed() {
                    self.wishes.next_visible = true;
                }
            }
            Task::EndShake { serial } => {
                if serial == self.shake_serial {
                    self.shaking = false;
                }
            }
        }
    }
}
