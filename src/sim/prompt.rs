//! Modal "continue?" prompt
//!
//! Blocks the frame loop until the player picks YES or NO. The minigame is
//! neither updated nor drawn while it is up.

use crate::platform::{Console, MenuEvent};

/// Sleep between empty polls
const POLL_SLEEP_US: u64 = 1_000;

const COLOR_TITLE: u8 = 15;
const COLOR_SELECTED: u8 = 14;
const COLOR_NORMAL: u8 = 7;

pub struct ContinuePrompt;

impl ContinuePrompt {
    /// Returns `true` for "continue", `false` for "stop" (Cancel counts as stop)
    pub fn run(console: &mut Console) -> bool {
        console.input.clear();
        let mut yes = true;

        loop {
            Self::draw(console, yes);

            loop {
                console.input.refresh();
                match console.input.poll_event() {
                    MenuEvent::None => console.clock.sleep_us(POLL_SLEEP_US),
                    MenuEvent::Left | MenuEvent::Up => {
                        yes = true;
                        break;
                    }
                    MenuEvent::Right | MenuEvent::Down => {
                        yes = false;
                        break;
                    }
                    MenuEvent::Accept => {
                        log::debug!("Continue prompt: {}", if yes { "yes" } else { "no" });
                        return yes;
                    }
                    MenuEvent::Cancel => {
                        log::debug!("Continue prompt cancelled");
                        return false;
                    }
                    MenuEvent::Char(_) => {}
                }
            }
        }
    }

    fn draw(console: &mut Console, yes: bool) {
        let (yes_color, no_color) = if yes {
            (COLOR_SELECTED, COLOR_NORMAL)
        } else {
            (COLOR_NORMAL, COLOR_SELECTED)
        };

        let frame = &mut console.frame;
        frame.clear(0);
        frame.text_centered(70, "CONTINUE", COLOR_TITLE);
        frame.text(112, 110, "YES", yes_color);
        frame.text(184, 110, "NO", no_color);
        console.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Clock, ManualClock, ScriptedInput};
    use crate::sim::testing::RecordingPresenter;

    fn answer(script: ScriptedInput) -> bool {
        let mut console = Console::headless(script);
        ContinuePrompt::run(&mut console)
    }

    #[test]
    fn test_accept_defaults_to_yes() {
        assert!(answer(ScriptedInput::new().events(&[MenuEvent::Accept])));
    }

    #[test]
    fn test_cancel_is_stop() {
        assert!(!answer(ScriptedInput::new().events(&[MenuEvent::Cancel])));
    }

    #[test]
    fn test_navigation() {
        assert!(!answer(
            ScriptedInput::new().events(&[MenuEvent::Right, MenuEvent::Accept])
        ));
        assert!(answer(ScriptedInput::new().events(&[
            MenuEvent::Down,
            MenuEvent::Up,
            MenuEvent::Accept
        ])));
        assert!(answer(
            ScriptedInput::new()
                .events(&[MenuEvent::Right])
                .idle(3)
                .events(&[MenuEvent::Left])
                .events(&[MenuEvent::Accept])
        ));
    }

    #[test]
    fn test_redraws_on_selection_change() {
        let (presenter, recorded) = RecordingPresenter::new();
        let clock = ManualClock::new();
        let mut console = Console::new(
            Box::new(clock.clone()),
            Box::new(
                ScriptedInput::new()
                    .idle(5)
                    .events(&[MenuEvent::Down, MenuEvent::Accept]),
            ),
            Box::new(presenter),
        );

        assert!(!ContinuePrompt::run(&mut console));
        assert_eq!(recorded.borrow().prompt_frames, 2);
        // Idle polls sleep instead of spinning
        assert_eq!(clock.now_us(), 5 * POLL_SLEEP_US);
    }
}
