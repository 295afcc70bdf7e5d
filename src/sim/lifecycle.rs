//! Minigame lifecycle contract
//!
//! Every minigame implements [`Minigame`]; the scheduler and the launcher
//! only ever talk to a game through it. [`Round`] wraps one instance and
//! enforces the per-instance state machine:
//!
//! ```text
//! Uninitialized -> Running -> Finished -> Ended
//!                         \-> Aborted
//! ```

use crate::audio::AudioQueue;
use crate::platform::{Console, InputDevice};
use crate::renderer::FrameBuffer;
use crate::settings::GameSettings;

use super::scheduler::{LoopResult, Scheduler};

/// What a tick may touch besides the game's own state
pub struct TickContext<'a> {
    pub input: &'a dyn InputDevice,
    pub audio: &'a mut AudioQueue,
}

/// The uniform minigame interface
pub trait Minigame {
    /// Reset all simulation state from `settings` and drain stale input.
    ///
    /// Leaves `previous == current`.
    fn init(&mut self, settings: &GameSettings, input: &mut dyn InputDevice);

    /// Copy every interpolated quantity from current into previous
    fn store_previous_state(&mut self);

    /// Advance exactly one fixed tick; no-op once finished
    fn update(&mut self, ctx: &mut TickContext<'_>);

    /// Render a blend of previous and current state (`alpha` in `[0, 1]`)
    fn draw_interpolated(&self, alpha: f32, frame: &mut FrameBuffer);

    /// Finalize score and detail text, release resources
    fn end(&mut self);

    fn is_finished(&self) -> bool;

    /// Meaningful once finished
    fn did_win(&self) -> bool;

    /// Meaningful after `end`
    fn score(&self) -> u64;

    /// Short outcome line for the end screen
    fn end_detail(&self) -> &str;
}

/// Lifecycle phase of one minigame instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Finished,
    Aborted,
    Ended,
}

/// Result of playing one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Completed {
        won: bool,
        /// Ended by the debug hotkey rather than by the game
        forced: bool,
        score: u64,
        detail: String,
    },
    /// The player quit; there is no score or detail to show
    Aborted,
}

impl RoundOutcome {
    /// Won on its own or via the debug hotkey
    pub fn is_win(&self) -> bool {
        matches!(self, RoundOutcome::Completed { won: true, .. })
    }
}

/// One minigame instance moving through its lifecycle
pub struct Round {
    game: Box<dyn Minigame>,
    phase: Phase,
    forced: bool,
}

impl Round {
    pub fn new(game: Box<dyn Minigame>) -> Self {
        Self {
            game,
            phase: Phase::Uninitialized,
            forced: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game(&self) -> &dyn Minigame {
        self.game.as_ref()
    }

    /// `Uninitialized -> Running`
    pub fn start(&mut self, settings: &GameSettings, input: &mut dyn InputDevice) -> bool {
        if self.phase != Phase::Uninitialized {
            log::warn!("Round already started ({:?}), ignoring init", self.phase);
            return false;
        }
        self.game.init(settings, input);
        self.phase = Phase::Running;
        true
    }

    /// `Running -> Finished | Aborted`
    pub fn run(
        &mut self,
        scheduler: &mut Scheduler,
        settings: &GameSettings,
        console: &mut Console,
    ) -> Option<LoopResult> {
        if self.phase != Phase::Running {
            log::warn!("Round is not running ({:?})", self.phase);
            return None;
        }

        let result = scheduler.run(self.game.as_mut(), settings, console);
        self.phase = match result {
            LoopResult::Finished => Phase::Finished,
            LoopResult::ForcedWin => {
                self.forced = true;
                Phase::Finished
            }
            LoopResult::Aborted => Phase::Aborted,
        };
        Some(result)
    }

    /// `Finished -> Ended`; an aborted round is never ended
    pub fn end(&mut self) -> Option<RoundOutcome> {
        match self.phase {
            Phase::Finished => {
                self.game.end();
                self.phase = Phase::Ended;
                Some(self.outcome())
            }
            Phase::Aborted => Some(RoundOutcome::Aborted),
            Phase::Ended => Some(self.outcome()),
            Phase::Uninitialized | Phase::Running => {
                log::warn!("Round cannot end from {:?}", self.phase);
                None
            }
        }
    }

    fn outcome(&self) -> RoundOutcome {
        RoundOutcome::Completed {
            won: self.forced || self.game.did_win(),
            forced: self.forced,
            score: self.game.score(),
            detail: self.game.end_detail().to_string(),
        }
    }

    /// Init, run to completion and end a fresh round in one go
    pub fn play(
        mut self,
        scheduler: &mut Scheduler,
        settings: &GameSettings,
        console: &mut Console,
    ) -> RoundOutcome {
        self.start(settings, console.input.as_mut());
        self.run(scheduler, settings, console);
        self.end().unwrap_or(RoundOutcome::Aborted)
    }
}
