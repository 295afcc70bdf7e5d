//! Tone queue shared by the minigames
//!
//! Minigames request tones during `update`; the scheduler advances the queue
//! once per rendered frame and hands the tone that should be sounding to the
//! presenter. Synthesis itself belongs to the platform.

use std::collections::VecDeque;

/// A single square-wave note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub freq_hz: u32,
    pub duration_ms: u32,
}

impl Tone {
    pub const fn new(freq_hz: u32, duration_ms: u32) -> Self {
        Self {
            freq_hz,
            duration_ms,
        }
    }
}

/// Played after a won round
pub const WIN_MELODY: [Tone; 3] = [
    Tone::new(523, 120),
    Tone::new(659, 120),
    Tone::new(784, 180),
];

/// Played after a lost round
pub const LOSE_MELODY: [Tone; 3] = [
    Tone::new(392, 140),
    Tone::new(330, 140),
    Tone::new(262, 220),
];

/// Queue of pending tones with the remaining time of the current one
#[derive(Debug, Default)]
pub struct AudioQueue {
    pending: VecDeque<Tone>,
    current: Option<Tone>,
    remaining_us: u64,
    enabled: bool,
}

impl AudioQueue {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable/disable output; disabling drops anything queued
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop();
        }
    }

    /// Interrupt whatever is playing with a single tone
    pub fn play_tone(&mut self, freq_hz: u32, duration_ms: u32) {
        if !self.enabled {
            return;
        }
        self.stop();
        self.pending.push_back(Tone::new(freq_hz, duration_ms));
    }

    /// Replace the queue with a melody
    pub fn play_melody(&mut self, notes: &[Tone]) {
        if !self.enabled {
            return;
        }
        self.stop();
        self.pending.extend(notes.iter().copied());
    }

    pub fn stop(&mut self) {
        self.pending.clear();
        self.current = None;
        self.remaining_us = 0;
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some() || !self.pending.is_empty()
    }

    /// Tone that should be sounding right now
    pub fn current(&self) -> Option<Tone> {
        self.current
    }

    /// Advance playback by `elapsed_us` of wall time
    pub fn advance(&mut self, elapsed_us: u64) {
        let mut budget = elapsed_us;
        loop {
            if self.current.is_none() {
                match self.pending.pop_front() {
                    Some(tone) => {
                        self.current = Some(tone);
                        self.remaining_us = u64::from(tone.duration_ms) * 1000;
                    }
                    None => return,
                }
            }
            if budget < self.remaining_us {
                self.remaining_us -= budget;
                return;
            }
            budget -= self.remaining_us;
            self.current = None;
            self.remaining_us = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_queue_ignores_requests() {
        let mut audio = AudioQueue::new(false);
        audio.play_tone(440, 50);
        audio.advance(0);
        assert!(!audio.is_playing());
        assert_eq!(audio.current(), None);
    }

    #[test]
    fn test_tone_expires() {
        let mut audio = AudioQueue::new(true);
        audio.play_tone(440, 50);
        audio.advance(0);
        assert_eq!(audio.current(), Some(Tone::new(440, 50)));

        audio.advance(49_000);
        assert!(audio.is_playing());
        audio.advance(1_000);
        assert!(!audio.is_playing());
    }

    #[test]
    fn test_melody_plays_in_order() {
        let mut audio = AudioQueue::new(true);
        audio.play_melody(&WIN_MELODY);
        audio.advance(0);
        assert_eq!(audio.current().map(|t| t.freq_hz), Some(523));

        // One long frame can cross a note boundary
        audio.advance(130_000);
        assert_eq!(audio.current().map(|t| t.freq_hz), Some(659));

        audio.advance(500_000);
        assert!(!audio.is_playing());
    }

    #[test]
    fn test_new_tone_interrupts() {
        let mut audio = AudioQueue::new(true);
        audio.play_melody(&LOSE_MELODY);
        audio.advance(10_000);
        audio.play_tone(320, 35);
        audio.advance(0);
        assert_eq!(audio.current(), Some(Tone::new(320, 35)));
    }
}
