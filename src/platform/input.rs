//! Input device abstraction
//!
//! Two views of the same hardware: a discrete menu event queue (used by
//! prompts and menus) and the raw held state of keys and joystick (used by
//! gameplay and by the scheduler's pause/quit edges).

use std::collections::VecDeque;

/// Raw keys the core cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Escape,
    /// Hardware pause toggle
    Pause,
    Ctrl,
    W,
}

/// Discrete menu-style event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuEvent {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    Accept,
    Cancel,
    /// A character typed directly (letters, digits, space)
    Char(char),
}

/// Digital joystick reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoystickState {
    /// -1, 0 or 1
    pub dx: i8,
    /// -1 (up), 0 or 1 (down)
    pub dy: i8,
    pub buttons: u8,
}

impl JoystickState {
    pub const BUTTON_ENTER: u8 = 0x01;
    pub const BUTTON_ESC: u8 = 0x02;

    pub fn pressed(&self, mask: u8) -> bool {
        self.buttons & mask != 0
    }
}

/// Keyboard/joystick driver as seen by the core
pub trait InputDevice {
    /// Sample the hardware for a new frame
    fn refresh(&mut self);

    /// Next pending menu event, `MenuEvent::None` when the queue is empty
    fn poll_event(&mut self) -> MenuEvent;

    /// Whether a key is currently held
    fn is_down(&self, key: Key) -> bool;

    /// Current joystick reading, `None` when no joystick is attached
    fn joystick(&self) -> Option<JoystickState>;

    fn joystick_available(&self) -> bool {
        self.joystick().is_some()
    }

    /// Drop all pending events
    fn clear(&mut self);
}

/// One frame of scripted input
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub held: Vec<Key>,
    pub events: Vec<MenuEvent>,
    pub joystick: Option<JoystickState>,
}

/// Replays a fixed sequence of frames; idles forever once the script ends.
///
/// Used by tests and by the headless runner.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<InputFrame>,
    current: InputFrame,
    pending: VecDeque<MenuEvent>,
    frames: u64,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` frames with nothing held
    pub fn idle(self, count: usize) -> Self {
        self.hold(&[], count)
    }

    /// `count` frames with the given keys held
    pub fn hold(mut self, keys: &[Key], count: usize) -> Self {
        for _ in 0..count {
            self.script.push_back(InputFrame {
                held: keys.to_vec(),
                ..Default::default()
            });
        }
        self
    }

    /// One frame that delivers the given menu events
    pub fn events(mut self, events: &[MenuEvent]) -> Self {
        self.script.push_back(InputFrame {
            events: events.to_vec(),
            ..Default::default()
        });
        self
    }

    /// Append an arbitrary frame
    pub fn frame(mut self, frame: InputFrame) -> Self {
        self.script.push_back(frame);
        self
    }

    /// Frames refreshed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl InputDevice for ScriptedInput {
    fn refresh(&mut self) {
        self.frames += 1;
        self.current = self.script.pop_front().unwrap_or_default();
        self.pending.extend(self.current.events.iter().copied());
    }

    fn poll_event(&mut self) -> MenuEvent {
        self.pending.pop_front().unwrap_or_default()
    }

    fn is_down(&self, key: Key) -> bool {
        self.current.held.contains(&key)
    }

    fn joystick(&self) -> Option<JoystickState> {
        self.current.joystick
    }

    fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_replays_then_idles() {
        let mut input = ScriptedInput::new().hold(&[Key::Up], 2).idle(1);

        input.refresh();
        assert!(input.is_down(Key::Up));
        input.refresh();
        assert!(input.is_down(Key::Up));
        input.refresh();
        assert!(!input.is_down(Key::Up));
        input.refresh();
        assert!(!input.is_down(Key::Up));
        assert_eq!(input.frames(), 4);
    }

    #[test]
    fn test_events_are_queued_until_cleared() {
        let mut input = ScriptedInput::new().events(&[MenuEvent::Down, MenuEvent::Accept]);
        input.refresh();
        assert_eq!(input.poll_event(), MenuEvent::Down);

        input.clear();
        assert_eq!(input.poll_event(), MenuEvent::None);
    }

    #[test]
    fn test_joystick_buttons() {
        let joy = JoystickState {
            buttons: JoystickState::BUTTON_ESC,
            ..Default::default()
        };
        assert!(joy.pressed(JoystickState::BUTTON_ESC));
        assert!(!joy.pressed(JoystickState::BUTTON_ENTER));
    }
}
