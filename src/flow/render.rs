//! Reflect sequencer state into a `View`
//!
//! Rendering writes the whole presentation from state, so it can run after any
//! event or timer callback without knowing what changed.

use super::screen::Screen;
use super::sequencer::Sequencer;
use crate::platform::{Slot, View, class};

pub const MUSIC_ON: &str = "🔊";
pub const MUSIC_OFF: &str = "🔇";
pub const TRACK_PLAY: &str = "▶";
pub const TRACK_PAUSE: &str = "⏸";

pub fn render<V: View + ?Sized>(seq: &Sequencer, view: &mut V) {
    let visible = seq.visible_screen();
    for screen in Screen::ALL {
        view.set_class(Slot::Screen(screen), class::ACTIVE, visible == Some(screen));
    }

    // Gate
    view.set_value(Slot::PasswordInput, seq.password_input());
    view.set_class(Slot::PasswordInput, class::SHAKE, seq.is_shaking());
    view.set_text(Slot::PasswordError, seq.password_error());

    // Landing
    let music = if seq.music_enabled() { MUSIC_ON } else { MUSIC_OFF };
    view.set_text(Slot::MusicToggle, music);

    // Stage 1
    view.set_text(Slot::TypingText, seq.typed_text());
    view.set_class(Slot::TypingText, class::COMPLETE, seq.reveal_complete());
    view.set_class(Slot::Stage1Next, class::HIDDEN, !seq.stage1_next_visible());

    // Stage 2
    view.set_text(Slot::WishDisplay, seq.wish_text());
    for i in 0..seq.total_wishes() {
        view.set_class(Slot::Wish(i), class::CLICKED, seq.wish_selected(i));
    }
    view.set_class(Slot::Stage2Next, class::HIDDEN, !seq.stage2_next_visible());

    // Stage 3
    for i in 0..seq.track_count() {
        let playing = seq.playing_track() == Some(i);
        view.set_class(Slot::TrackButton(i), class::PLAYING, playing);
        view.set_text(
            Slot::TrackButton(i),
            if playing { TRACK_PAUSE } else { TRACK_PLAY },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GreetingConfig;
    use crate::flow::TimerQueue;
    use crate::platform::testing::RecordingView;

    #[test]
    fn test_initial_render() {
        let seq = Sequencer::new(GreetingConfig::default()).expect("valid config");
        let mut view = RecordingView::default();
        render(&seq, &mut view);

        assert!(view.has_class(Slot::Screen(Screen::Gate), class::ACTIVE));
        assert!(!view.has_class(Slot::Screen(Screen::Landing), class::ACTIVE));
        assert!(view.has_class(Slot::Stage1Next, class::HIDDEN));
        assert!(view.has_class(Slot::Stage2Next, class::HIDDEN));
        assert_eq!(view.text(Slot::MusicToggle), MUSIC_OFF);
        assert_eq!(view.text(Slot::TrackButton(0)), TRACK_PLAY);
    }

    #[test]
    fn test_wrong_password_render() {
        let mut seq = Sequencer::new(GreetingConfig::default()).expect("valid config");
        let mut view = RecordingView::default();

        seq.edit_password("sun");
        assert!(seq.submit_password().is_err());
        render(&seq, &mut view);

        assert_eq!(view.value(Slot::PasswordInput), "");
        assert!(!view.text(Slot::PasswordError).is_empty());
        assert!(view.has_class(Slot::PasswordInput, class::SHAKE));
        assert!(view.has_class(Slot::Screen(Screen::Gate), class::ACTIVE));
    }

    #[test]
    fn test_no_screen_active_during_switch() {
        let mut seq = Sequencer::new(GreetingConfig::default()).expect("valid config");
        let mut timers = TimerQueue::new();
        let mut view = RecordingView::default();

        seq.edit_password("moon");
        seq.submit_password().expect("correct password");
        render(&seq, &mut view);
        assert!(
            Screen::ALL
                .iter()
                .all(|&s| !view.has_class(Slot::Screen(s), class::ACTIVE))
        );

        timers.settle(&mut seq);
        render(&seq, &mut view);
        assert!(view.has_class(Slot::Screen(Screen::Landing), class::ACTIVE));
        assert!(!view.has_class(Slot::Screen(Screen::Gate), class::ACTIVE));
    }

    #[test]
    fn test_playlist_render() {
        let mut seq = Sequencer::new(GreetingConfig::default()).expect("valid config");
        let mut timers = TimerQueue::new();
        let mut view = RecordingView::default();

        seq.edit_password("moon");
        seq.submit_password().expect("correct password");
        timers.settle(&mut seq);
        seq.start();
        timers.settle(&mut seq);
        seq.advance();
        timers.settle(&mut seq);
        for i in 0..seq.total_wishes() {
            seq.select_wish(i);
        }
        render(&seq, &mut view);
        assert!((0..seq.total_wishes()).all(|i| view.has_class(Slot::Wish(i), class::CLICKED)));
        assert_eq!(view.text(Slot::WishDisplay), seq.config().wishes[5]);

        timers.settle(&mut seq);
        seq.advance();
        timers.settle(&mut seq);

        seq.select_track(0);
        seq.select_track(2);
        render(&seq, &mut view);
        assert!(view.has_class(Slot::TrackButton(2), class::PLAYING));
        assert!(!view.has_class(Slot::TrackButton(0), class::PLAYING));
        assert_eq!(view.text(Slot::TrackButton(2)), TRACK_PAUSE);
        assert_eq!(view.text(Slot::TrackButton(0)), TRACK_PLAY);
        assert!(!view.has_class(Slot::Wish(0), class::CLICKED));
    }
}
