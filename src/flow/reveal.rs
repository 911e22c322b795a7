//! Letter-by-letter message reveal
//!
//! The reveal is an explicit sequence: each timer callback asks for the next
//! step with the generation it was scheduled under. Restarting bumps the
//! generation, so callbacks left over from an earlier run come back `Stale`
//! and two runs can never interleave.

/// Where the reveal currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealPhase {
    #[default]
    Idle,
    Typing,
    Complete,
}

/// Result of advancing the reveal by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// One more character is visible; schedule the next step
    Typed(char),
    /// Whole message visible, reveal is now complete
    Finished,
    /// Step belongs to a cancelled or finished run
    Stale,
}

#[derive(Debug, Clone)]
pub struct Reveal {
    message: String,
    /// Byte offset of the visible prefix (always on a char boundary)
    cursor: usize,
    generation: u32,
    phase: RevealPhase,
}

impl Reveal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cursor: 0,
            generation: 0,
            phase: RevealPhase::Idle,
        }
    }

    /// Start over from an empty text. Returns the generation of the new run.
    pub fn restart(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.cursor = 0;
        self.phase = RevealPhase::Typing;
        self.generation
    }

    /// Abandon any run in flight and clear the text
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.cursor = 0;
        self.phase = RevealPhase::Idle;
    }

    pub fn step(&mut self, generation: u32) -> RevealStep {
        if generation != self.generation || self.phase != RevealPhase::Typing {
            return RevealStep::Stale;
        }

        match self.message[self.cursor..].chars().next() {
            Some(c) => {
                self.cursor += c.len_utf8();
                RevealStep::Typed(c)
            }
            None => {
                self.phase = RevealPhase::Complete;
                RevealStep::Finished
            }
        }
    }

    /// Visible prefix of the message
    pub fn text(&self) -> &str {
        &self.message[..self.cursor]
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RevealPhase::Complete
    }

    /// True if `generation` is the run currently owning the reveal
    pub fn is_current(&self, generation: u32) -> bool {
        generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_one_char_per_step() {
        let mut reveal = Reveal::new("héllo");
        let generation = reveal.restart();

        let mut typed = String::new();
        loop {
            match reveal.step(generation) {
                RevealStep::Typed(c) => {
                    typed.push(c);
                    assert_eq!(reveal.text(), typed);
                    assert!(!reveal.is_complete());
                }
                RevealStep::Finished => break,
                RevealStep::Stale => panic!("current run reported stale"),
            }
        }

        assert_eq!(typed, "héllo");
        assert!(reveal.is_complete());
        assert_eq!(reveal.step(generation), RevealStep::Stale);
    }

    #[test]
    fn test_restart_invalidates_old_run() {
        let mut reveal = Reveal::new("abc");
        let first = reveal.restart();
        assert_eq!(reveal.step(first), RevealStep::Typed('a'));

        let second = reveal.restart();
        assert_eq!(reveal.text(), "");
        assert_eq!(reveal.step(first), RevealStep::Stale);
        assert_eq!(reveal.step(second), RevealStep::Typed('a'));
        assert_eq!(reveal.text(), "a");
    }

    #[test]
    fn test_cancel() {
        let mut reveal = Reveal::new("abc");
        let generation = reveal.restart();
        reveal.step(generation);
        reveal.cancel();

        assert_eq!(reveal.phase(), RevealPhase::Idle);
        assert_eq!(reveal.text(), "");
        assert_eq!(reveal.step(generation), RevealStep::Stale);
    }

    #[test]
    fn test_empty_message_finishes_immediately() {
        let mut reveal = Reveal::new("");
        let generation = reveal.restart();
        assert_eq!(reveal.step(generation), RevealStep::Finished);
        assert!(reveal.is_complete());
    }
}
