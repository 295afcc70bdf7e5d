//! Fixed timestep accumulator
//!
//! Wall-clock frame time goes in, a bounded number of 60 Hz ticks comes out.
//! Two guards keep a slow or suspended host from stalling the game:
//! - a single frame is never charged more than `MAX_FRAME_US`
//! - at most `MAX_TICKS_PER_FRAME` ticks run per frame; when the cap is hit
//!   the leftover time is dropped instead of carried over

use crate::consts::{MAX_FRAME_US, MAX_TICKS_PER_FRAME, TICK_US};

#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator_us: u64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.accumulator_us = 0;
    }

    pub fn accumulator_us(&self) -> u64 {
        self.accumulator_us
    }

    /// Charge one frame's elapsed time; returns the (clamped) amount charged
    pub fn accumulate(&mut self, frame_us: u64) -> u64 {
        let frame_us = frame_us.min(MAX_FRAME_US);
        self.accumulator_us += frame_us;
        frame_us
    }

    /// Run every tick that is due, up to the per-frame cap.
    ///
    /// Returns how many ticks ran.
    pub fn run_ticks(&mut self, mut tick: impl FnMut()) -> u32 {
        let mut ticks = 0;
        while self.accumulator_us >= TICK_US && ticks < MAX_TICKS_PER_FRAME {
            tick();
            self.accumulator_us -= TICK_US;
            ticks += 1;
        }

        if ticks >= MAX_TICKS_PER_FRAME {
            self.accumulator_us = 0;
        }

        ticks
    }

    /// Fraction of a tick sitting in the accumulator
    pub fn alpha(&self) -> f32 {
        self.accumulator_us as f32 / TICK_US as f32
    }
}
