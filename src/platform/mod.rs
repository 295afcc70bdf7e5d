//! Platform abstraction layer
//!
//! Handles the collaborators the core does not implement itself:
//! - Time/sleeping
//! - Input devices
//! - Presentation (see `renderer`)

pub mod input;
pub mod time;

pub use input::{InputDevice, InputFrame, JoystickState, Key, MenuEvent, ScriptedInput};
pub use time::{Clock, ManualClock, SystemClock};

use crate::audio::AudioQueue;
use crate::renderer::{FrameBuffer, NullPresenter, Presenter};

/// Everything a running round talks to, owned in one place and passed down
/// explicitly instead of living in globals.
pub struct Console {
    pub clock: Box<dyn Clock>,
    pub input: Box<dyn InputDevice>,
    pub presenter: Box<dyn Presenter>,
    pub audio: AudioQueue,
    pub frame: FrameBuffer,
}

impl Console {
    pub fn new(
        clock: Box<dyn Clock>,
        input: Box<dyn InputDevice>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        Self {
            clock,
            input,
            presenter,
            audio: AudioQueue::new(true),
            frame: FrameBuffer::new(),
        }
    }

    /// Virtual-time console with scripted input and no output
    pub fn headless(input: ScriptedInput) -> Self {
        Self::new(
            Box::new(ManualClock::new()),
            Box::new(input),
            Box::new(NullPresenter::default()),
        )
    }

    /// Hand the frame buffer and current tone to the presenter
    pub fn present(&mut self) {
        self.presenter.sound(self.audio.current());
        self.presenter.present(&self.frame);
    }
}
