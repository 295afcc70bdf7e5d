//! Fixed-step simulation/render scheduler
//!
//! Runs one minigame at a constant 60 Hz tick rate while rendering every
//! frame with interpolation. Also owns the pause toggle, the quit edge that
//! opens the continue prompt, and (story builds with the debug flag) the
//! forced-win hotkey.

use crate::consts::TICK_US;
use crate::platform::{Console, InputDevice, JoystickState, Key};
use crate::settings::{GameSettings, InputMode};

use super::lifecycle::{Minigame, TickContext};
use super::prompt::ContinuePrompt;
use super::step::FixedStep;

/// How a scheduler invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopResult {
    /// The game reported a definitive outcome
    Finished,
    /// The player quit from the continue prompt
    Aborted,
    /// Debug hotkey skipped the round
    ForcedWin,
}

/// Startup-resolved scheduler options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Ctrl+W ends the round as a win (story mode, debug builds only)
    pub forced_win_hotkey: bool,
}

impl SchedulerConfig {
    /// Story variant; the hotkey only exists when `debug` is set
    pub fn story(debug: bool) -> Self {
        Self {
            forced_win_hotkey: debug,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

/// Rising-edge detector for a held button
#[derive(Debug, Default)]
struct Edge {
    was_down: bool,
}

impl Edge {
    fn rising(&mut self, down: bool) -> bool {
        let rising = down && !self.was_down;
        self.was_down = down;
        rising
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Drive `game` until it finishes or the player aborts.
    ///
    /// `settings` is read once, to decide whether the joystick escape button
    /// also opens the continue prompt.
    pub fn run(
        &mut self,
        game: &mut dyn Minigame,
        settings: &GameSettings,
        console: &mut Console,
    ) -> LoopResult {
        let joystick_quit = settings.input_mode == InputMode::Joystick;
        let mut step = FixedStep::new();
        let mut last_us = console.clock.now_us();
        let mut paused = false;
        let mut pause_edge = Edge::default();
        let mut quit_edge = Edge::default();

        while !game.is_finished() {
            console.input.refresh();

            if self.config.forced_win_hotkey
                && console.input.is_down(Key::Ctrl)
                && console.input.is_down(Key::W)
            {
                log::warn!("Forced win hotkey used");
                return LoopResult::ForcedWin;
            }

            if pause_edge.rising(console.input.is_down(Key::Pause)) {
                paused = !paused;
                log::debug!("Pause toggled: {}", paused);
            }

            if quit_edge.rising(quit_down(console.input.as_ref(), joystick_quit)) {
                if !ContinuePrompt::run(console) {
                    log::info!("Round aborted from continue prompt");
                    return LoopResult::Aborted;
                }
                // Time spent in the prompt is not charged to the simulation
                console.input.clear();
                last_us = console.clock.now_us();
                step.reset();
            }

            let now_us = console.clock.now_us();

            if paused {
                last_us = now_us;
                Self::draw(game, &step, console);
                console.clock.sleep_us(TICK_US);
                continue;
            }

            let frame_us = step.accumulate(now_us.saturating_sub(last_us));
            last_us = now_us;

            {
                let Console { input, audio, .. } = &mut *console;
                let mut ctx = TickContext {
                    input: input.as_ref(),
                    audio,
                };
                step.run_ticks(|| {
                    game.store_previous_state();
                    game.update(&mut ctx);
                });
            }

            console.audio.advance(frame_us);
            Self::draw(game, &step, console);

            let elapsed_us = console.clock.now_us().saturating_sub(last_us);
            if elapsed_us < TICK_US {
                console.clock.sleep_us(TICK_US - elapsed_us);
            }
        }

        LoopResult::Finished
    }

    fn draw(game: &dyn Minigame, step: &FixedStep, console: &mut Console) {
        game.draw_interpolated(step.alpha(), &mut console.frame);
        console.present();
    }
}

/// Escape key, or the joystick escape button in joystick mode
fn quit_down(input: &dyn InputDevice, joystick_quit: bool) -> bool {
    if input.is_down(Key::Escape) {
        return true;
    }
    joystick_quit
        && input
            .joystick()
            .is_some_and(|joy| joy.pressed(JoystickState::BUTTON_ESC))
}
