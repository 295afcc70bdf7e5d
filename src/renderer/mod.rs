//! Rendering module
//!
//! Minigames draw into a software `FrameBuffer`; a `Presenter` pushes the
//! finished frame (and the current tone) to the real display/speaker.

pub mod framebuffer;

pub use framebuffer::{FrameBuffer, TextLabel};

use crate::audio::Tone;

/// Display/speaker backend, called once per rendered frame
pub trait Presenter {
    fn present(&mut self, frame: &FrameBuffer);

    /// Tone that should be sounding this frame (`None` = silence)
    fn sound(&mut self, _tone: Option<Tone>) {}
}

/// Discards frames, only counting them
#[derive(Debug, Default)]
pub struct NullPresenter {
    pub frames: u64,
}

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &FrameBuffer) {
        self.frames += 1;
    }
}
