//! Year Arcade - nine arcade minigames across the years
//!
//! Core modules:
//! - `sim`: Fixed-step scheduler, minigame lifecycle contract, continue prompt
//! - `games`: Year catalog and the bundled minigames
//! - `launcher`: Extra/story launches, end-of-round flow, high-score entry
//! - `story`: Campaign sequencing with cumulative score and retries
//! - `platform`: Clock and input device abstractions
//! - `renderer`: Indexed-color frame buffer and presentation
//! - `persistence`: Versioned JSON save/load

pub mod audio;
pub mod games;
pub mod highscores;
pub mod launcher;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod story;

pub use highscores::HighScores;
pub use settings::{Difficulty, GameSettings, GameSpeed, InputMode, Options};
pub use sim::{LoopResult, Minigame, Scheduler, SchedulerConfig};

/// Timing and screen constants
pub mod consts {
    /// Fixed simulation tick (60 Hz) in microseconds
    pub const TICK_US: u64 = 16_667;
    /// Maximum ticks simulated per rendered frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 5;
    /// Longest frame charged to the simulation (host pause, debugger stop)
    pub const MAX_FRAME_US: u64 = 250_000;

    /// Logical screen size
    pub const VIDEO_WIDTH: i32 = 320;
    pub const VIDEO_HEIGHT: i32 = 200;
    /// Glyph cell size used to center text labels
    pub const GLYPH_WIDTH: i32 = 8;
}

/// Linear blend between a previous and current value
#[inline]
pub fn lerp(prev: f32, current: f32, alpha: f32) -> f32 {
    prev + (current - prev) * alpha
}

/// Clamp into `[min, max]`; never panics, unlike `f32::clamp` with `min > max`
#[inline]
pub fn clampf(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
