//! Player options and the per-launch settings snapshot
//!
//! `Options` is the mutable record edited by the options screen and persisted
//! next to the high scores. `GameSettings` is the copy handed to a minigame
//! when it starts; later option changes never reach a running round.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Difficulty levels (ordinal, Hard is the ceiling)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// One-letter tag for HUDs
    pub fn short(&self) -> &'static str {
        match self {
            Difficulty::Easy => "E",
            Difficulty::Normal => "N",
            Difficulty::Hard => "H",
        }
    }

    /// Map a raw ordinal, clamping anything past Hard
    pub fn from_ordinal(n: u8) -> Self {
        match n {
            0 => Difficulty::Easy,
            1 => Difficulty::Normal,
            _ => Difficulty::Hard,
        }
    }
}

/// Global game speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameSpeed {
    #[default]
    Normal,
    Turbo,
}

impl GameSpeed {
    pub fn multiplier(&self) -> f32 {
        match self {
            GameSpeed::Normal => 1.0,
            GameSpeed::Turbo => 1.25,
        }
    }
}

/// Preferred input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    #[default]
    Keyboard,
    Joystick,
}

/// Immutable settings copied into a minigame at init
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSettings {
    pub difficulty: Difficulty,
    pub sound_enabled: bool,
    pub input_mode: InputMode,
    pub game_speed: GameSpeed,
    /// 1.0 for Normal, 1.25 for Turbo
    pub speed_multiplier: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Options::default().snapshot()
    }
}

/// Persistent player options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    difficulty: Difficulty,
    sound_enabled: bool,
    game_speed: GameSpeed,
    input_mode: InputMode,

    /// Changed since the last successful save
    #[serde(skip)]
    dirty: bool,
    /// The file on disk was unreadable and must be rewritten
    #[serde(skip)]
    force_save: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            sound_enabled: true,
            game_speed: GameSpeed::Normal,
            input_mode: InputMode::Keyboard,
            dirty: false,
            force_save: false,
        }
    }
}

impl Options {
    /// File name inside the data directory
    pub const FILE_NAME: &'static str = "options.json";

    /// Load options, falling back to defaults on a missing or damaged file
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<Options>(path) {
            Ok(Some(options)) => {
                log::info!("Loaded options from {}", path.display());
                options
            }
            Ok(None) => {
                log::info!("Using default options");
                Self::default()
            }
            Err(e) => {
                log::warn!("Options file {} unusable ({}), using defaults", path.display(), e);
                Self {
                    force_save: true,
                    ..Self::default()
                }
            }
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn game_speed(&self) -> GameSpeed {
        self.game_speed
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty != difficulty {
            self.difficulty = difficulty;
            self.dirty = true;
        }
    }

    /// Raw ordinal from the options menu; anything past Hard stays Hard
    pub fn set_difficulty_ordinal(&mut self, ordinal: u8) {
        self.set_difficulty(Difficulty::from_ordinal(ordinal));
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.sound_enabled != enabled {
            self.sound_enabled = enabled;
            self.dirty = true;
        }
    }

    pub fn set_game_speed(&mut self, speed: GameSpeed) {
        if self.game_speed != speed {
            self.game_speed = speed;
            self.dirty = true;
        }
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        if self.input_mode != mode {
            self.input_mode = mode;
            self.dirty = true;
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.game_speed.multiplier()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || self.force_save
    }

    /// Capture the settings for one minigame launch
    pub fn snapshot(&self) -> GameSettings {
        GameSettings {
            difficulty: self.difficulty,
            sound_enabled: self.sound_enabled,
            input_mode: self.input_mode,
            game_speed: self.game_speed,
            speed_multiplier: self.speed_multiplier(),
        }
    }

    /// Write the options only if something changed
    pub fn save_if_dirty(&mut self, path: &Path) -> persistence::Result<()> {
        if !self.is_dirty() {
            return Ok(());
        }
        persistence::save_json(path, self)?;
        self.dirty = false;
        self.force_save = false;
        log::info!("Options saved");
        Ok(())
    }
}
