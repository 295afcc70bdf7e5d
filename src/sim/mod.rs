//! Fixed-step scheduler and minigame lifecycle
//!
//! The scheduler never looks inside a game. It only:
//! - ticks at a constant 60 Hz through the `Minigame` trait
//! - renders every frame with an interpolation alpha
//! - handles pause, the continue prompt and the debug forced win

pub mod lifecycle;
pub mod prompt;
pub mod scheduler;
pub mod step;

#[cfg(test)]
pub(crate) mod testing;

pub use lifecycle::{Minigame, Phase, Round, RoundOutcome, TickContext};
pub use prompt::ContinuePrompt;
pub use scheduler::{LoopResult, Scheduler, SchedulerConfig};
pub use step::FixedStep;
