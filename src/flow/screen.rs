//! Screens of the greeting

/// One full-page screen. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Password prompt
    #[default]
    Gate,
    /// Welcome screen with the start button and music toggle
    Landing,
    /// Typed message
    Stage1,
    /// Clickable wishes
    Stage2,
    /// Mock playlist
    Stage3,
    /// Closing screen with replay
    Final,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Gate,
        Screen::Landing,
        Screen::Stage1,
        Screen::Stage2,
        Screen::Stage3,
        Screen::Final,
    ];

    /// DOM id of the screen container
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::Gate => "password-screen",
            Screen::Landing => "landing-screen",
            Screen::Stage1 => "level1-screen",
            Screen::Stage2 => "level2-screen",
            Screen::Stage3 => "level3-screen",
            Screen::Final => "final-screen",
        }
    }

    /// Screen reached by the stage "next" button, if this screen has one
    pub fn next_stage(&self) -> Option<Screen> {
        match self {
            Screen::Stage1 => Some(Screen::Stage2),
            Screen::Stage2 => Some(Screen::Stage3),
            Screen::Stage3 => Some(Screen::Final),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids_unique() {
        let mut ids: Vec<_> = Screen::ALL.iter().map(Screen::element_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Screen::ALL.len());
    }

    #[test]
    fn test_next_stage_chain() {
        assert_eq!(Screen::default(), Screen::Gate);
        assert_eq!(Screen::Stage1.next_stage(), Some(Screen::Stage2));
        assert_eq!(Screen::Stage3.next_stage(), Some(Screen::Final));
        assert_eq!(Screen::Final.next_stage(), None);
        assert_eq!(Screen::Gate.next_stage(), None);
    }
}
