//! Year launcher
//!
//! Starts minigames in extra mode (play-again loop with high scores) or as a
//! story stage (retry until cleared). Every attempt gets a fresh module
//! instance from the catalog and a settings snapshot taken at launch.

pub mod screens;

use std::env;
use std::path::PathBuf;

use crate::audio::{LOSE_MELODY, WIN_MELODY};
use crate::games::{Catalog, Year};
use crate::highscores::{Board, HighScores};
use crate::platform::Console;
use crate::settings::{GameSettings, Options};
use crate::sim::{ContinuePrompt, Round, RoundOutcome, Scheduler, SchedulerConfig};

pub use screens::{EndScreen, InitialsEntry, InitialsPrompt, Screens, TextScreens};

/// Startup configuration resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Where options and high scores live
    pub data_dir: PathBuf,
    /// Enables the story forced-win hotkey
    pub debug: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            debug: false,
        }
    }
}

impl LaunchConfig {
    pub const DATA_ENV: &'static str = "YEAR_ARCADE_DATA";
    pub const DEBUG_ENV: &'static str = "YEAR_ARCADE_DEBUG";

    pub fn from_env() -> Self {
        Self::from_vars(env::var(Self::DATA_ENV).ok(), env::var(Self::DEBUG_ENV).ok())
    }

    /// Build from raw variable values; anything but `1`/`true` leaves debug off
    pub fn from_vars(data_dir: Option<String>, debug: Option<String>) -> Self {
        let data_dir = data_dir
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let debug = debug.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
        Self { data_dir, debug }
    }

    pub fn options_path(&self) -> PathBuf {
        self.data_dir.join(Options::FILE_NAME)
    }

    pub fn high_scores_path(&self) -> PathBuf {
        self.data_dir.join(HighScores::FILE_NAME)
    }
}

/// How a year was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Picked from the year menu: play again until the player stops
    Extra,
    /// One story year from the menu: a single win moves on
    Story,
}

/// Result of one story stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageResult {
    Cleared { score: u64, retries: u32 },
    /// The player quit; the story ends
    Aborted,
    /// No module for this year
    Unavailable,
}

/// Owns the console and the persistent records across launches
pub struct Launcher<C: Catalog, S: Screens> {
    pub console: Console,
    pub options: Options,
    pub high_scores: HighScores,
    pub(crate) config: LaunchConfig,
    pub(crate) catalog: C,
    pub(crate) screens: S,
}

impl<C: Catalog, S: Screens> Launcher<C, S> {
    /// Load options and high scores from `config.data_dir`
    pub fn new(config: LaunchConfig, console: Console, catalog: C, screens: S) -> Self {
        let options = Options::load(&config.options_path());
        let high_scores = HighScores::load(&config.high_scores_path());
        Self {
            console,
            options,
            high_scores,
            config,
            catalog,
            screens,
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn screens(&self) -> &S {
        &self.screens
    }

    /// Snapshot the options and apply the sound switch to the audio queue
    pub(crate) fn begin_launch(&mut self) -> GameSettings {
        let settings = self.options.snapshot();
        self.console.audio.set_enabled(settings.sound_enabled);
        settings
    }

    /// Play `year` until the player stops (extra) or wins once (story)
    pub fn launch_year(&mut self, year: Year, mode: LaunchMode) {
        let settings = self.begin_launch();
        let mut scheduler = Scheduler::new(SchedulerConfig::default());
        log::info!("Launching {} ({:?})", year.number(), mode);

        loop {
            let Some(game) = self.catalog.create(year) else {
                log::warn!("No minigame available for {}", year.number());
                self.screens.unavailable(&mut self.console, year);
                return;
            };

            let outcome = Round::new(game).play(&mut scheduler, &settings, &mut self.console);
            match outcome {
                RoundOutcome::Aborted => {
                    log::info!("{} aborted", year.number());
                    return;
                }
                RoundOutcome::Completed {
                    won: true,
                    score,
                    detail,
                    ..
                } => {
                    log::info!("{} won: {}", year.number(), detail);
                    self.finish_win(Board::Year(year), &settings, score, &detail);
                    match mode {
                        LaunchMode::Story => {
                            self.screens.next_stage(&mut self.console);
                            return;
                        }
                        LaunchMode::Extra => {
                            if !ContinuePrompt::run(&mut self.console) {
                                return;
                            }
                        }
                    }
                }
                RoundOutcome::Completed { detail, .. } => {
                    log::info!("{} lost: {}", year.number(), detail);
                    self.play_lose_melody(&settings);
                }
            }
        }
    }

    /// Retry `year` until it is cleared or the player quits
    pub fn run_story_stage(
        &mut self,
        year: Year,
        settings: &GameSettings,
        scheduler: &mut Scheduler,
    ) -> StageResult {
        let mut retries = 0u32;
        loop {
            let Some(game) = self.catalog.create(year) else {
                return StageResult::Unavailable;
            };

            let outcome = Round::new(game).play(scheduler, settings, &mut self.console);
            match outcome {
                RoundOutcome::Aborted => return StageResult::Aborted,
                RoundOutcome::Completed {
                    won: true,
                    forced,
                    score,
                    ..
                } => {
                    log::info!(
                        "Stage {} cleared (score {}, retries {}, forced {})",
                        year.number(),
                        score,
                        retries,
                        forced
                    );
                    return StageResult::Cleared { score, retries };
                }
                RoundOutcome::Completed { .. } => {
                    retries += 1;
                    log::debug!("Stage {} lost, retry {}", year.number(), retries);
                    self.play_lose_melody(settings);
                }
            }
        }
    }

    /// End screen, win jingle and (if it qualifies) initials entry
    pub(crate) fn finish_win(
        &mut self,
        board: Board,
        settings: &GameSettings,
        score: u64,
        detail: &str,
    ) {
        let record = self.high_scores.qualifies(board, settings.difficulty, score);
        if settings.sound_enabled {
            self.console.audio.play_melody(&WIN_MELODY);
        }
        self.screens.end_screen(
            &mut self.console,
            &EndScreen {
                won: true,
                detail,
                record,
            },
        );
        if record {
            self.record_score(board, settings, score, "YOU WIN", detail);
        }
    }

    pub(crate) fn record_score(
        &mut self,
        board: Board,
        settings: &GameSettings,
        score: u64,
        title: &str,
        detail: &str,
    ) {
        let table_empty = self.high_scores.table(board, settings.difficulty).is_empty();
        let initials = self.screens.enter_initials(
            &mut self.console,
            &InitialsPrompt {
                title,
                detail,
                table_empty,
            },
        );
        self.high_scores
            .insert(board, settings.difficulty, score, &initials);
        if let Err(e) = self.high_scores.save(&self.config.high_scores_path()) {
            log::warn!("Failed to save high scores: {}", e);
        }
    }

    fn play_lose_melody(&mut self, settings: &GameSettings) {
        if settings.sound_enabled {
            self.console.audio.play_melody(&LOSE_MELODY);
        }
    }
}
