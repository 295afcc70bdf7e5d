//! Test doubles for the scheduler, the launcher and the story

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::Tone;
use crate::games::Year;
use crate::launcher::{EndScreen, InitialsPrompt, Screens};
use crate::platform::{Console, InputDevice, ManualClock};
use crate::renderer::{FrameBuffer, Presenter};
use crate::settings::GameSettings;
use crate::story::StoryRun;

use super::lifecycle::{Minigame, TickContext};

#[derive(Debug, Clone, Copy)]
pub struct Draw {
    pub alpha: f32,
    /// Updates that had run when this frame was drawn
    pub updates: u32,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub inits: u32,
    pub stores: u32,
    pub updates: u32,
    pub ends: u32,
    pub draws: Vec<Draw>,
    pub order: Vec<&'static str>,
    /// Updates that found `previous != current` on entry
    pub previous_mismatches: u32,
    pub last_settings: Option<GameSettings>,
}

/// Minigame whose "simulation" is a tick counter
pub struct ScriptedGame {
    calls: Rc<RefCell<Calls>>,
    finish_after: u32,
    win: bool,
    win_score: u64,
    stall: Option<(u32, ManualClock, u64)>,
    current: u32,
    previous: u32,
    final_score: u64,
    detail: String,
}

impl Default for ScriptedGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGame {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Calls::default())),
            finish_after: u32::MAX,
            win: false,
            win_score: 0,
            stall: None,
            current: 0,
            previous: 0,
            final_score: 0,
            detail: String::new(),
        }
    }

    pub fn finish_after(mut self, ticks: u32) -> Self {
        self.finish_after = ticks;
        self
    }

    pub fn winning(mut self, score: u64) -> Self {
        self.win = true;
        self.win_score = score;
        self
    }

    pub fn losing(mut self) -> Self {
        self.win = false;
        self
    }

    /// Jump `clock` forward by `us` during update number `tick`
    pub fn stall_at(mut self, tick: u32, clock: ManualClock, us: u64) -> Self {
        self.stall = Some((tick, clock, us));
        self
    }

    /// Share the call log with the given one (for games built by a factory)
    pub fn with_calls(mut self, calls: Rc<RefCell<Calls>>) -> Self {
        self.calls = calls;
        self
    }

    pub fn calls(&self) -> Rc<RefCell<Calls>> {
        Rc::clone(&self.calls)
    }
}

impl Minigame for ScriptedGame {
    fn init(&mut self, settings: &GameSettings, input: &mut dyn InputDevice) {
        input.clear();
        self.current = 0;
        self.previous = 0;
        self.final_score = 0;
        self.detail.clear();
        let mut calls = self.calls.borrow_mut();
        calls.inits += 1;
        calls.last_settings = Some(*settings);
    }

    fn store_previous_state(&mut self) {
        self.previous = self.current;
        let mut calls = self.calls.borrow_mut();
        calls.stores += 1;
        calls.order.push("store");
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        if self.is_finished() {
            return;
        }
        let mut calls = self.calls.borrow_mut();
        if self.previous != self.current {
            calls.previous_mismatches += 1;
        }
        self.current += 1;
        calls.updates += 1;
        calls.order.push("update");

        if let Some((tick, clock, us)) = &self.stall {
            if *tick == self.current {
                clock.advance(*us);
            }
        }
    }

    fn draw_interpolated(&self, alpha: f32, frame: &mut FrameBuffer) {
        frame.clear(0);
        let mut calls = self.calls.borrow_mut();
        let updates = calls.updates;
        calls.draws.push(Draw { alpha, updates });
    }

    fn end(&mut self) {
        self.calls.borrow_mut().ends += 1;
        if self.win {
            self.final_score = self.win_score;
            self.detail = "WIN".to_string();
        } else {
            self.detail = "LOSE".to_string();
        }
    }

    fn is_finished(&self) -> bool {
        self.current >= self.finish_after
    }

    fn did_win(&self) -> bool {
        self.is_finished() && self.win
    }

    fn score(&self) -> u64 {
        self.final_score
    }

    fn end_detail(&self) -> &str {
        &self.detail
    }
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub frames: u64,
    /// Frames showing the continue prompt
    pub prompt_frames: u64,
    pub tones: Vec<Option<Tone>>,
}

/// Presenter that remembers what it was shown
pub struct RecordingPresenter {
    recorded: Rc<RefCell<Recorded>>,
}

impl RecordingPresenter {
    pub fn new() -> (Self, Rc<RefCell<Recorded>>) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        (
            Self {
                recorded: Rc::clone(&recorded),
            },
            recorded,
        )
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, frame: &FrameBuffer) {
        let mut recorded = self.recorded.borrow_mut();
        recorded.frames += 1;
        if frame.has_text("CONTINUE") {
            recorded.prompt_frames += 1;
        }
    }

    fn sound(&mut self, tone: Option<Tone>) {
        self.recorded.borrow_mut().tones.push(tone);
    }
}

/// A between-round screen as the launcher requested it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    End {
        won: bool,
        detail: String,
        record: bool,
    },
    Initials,
    NextStage,
    Unavailable(Year),
    Cutscene(String),
    StoryFinal(StoryRun),
    NotRanked(u64),
}

/// Screens that return immediately and log what was asked of them
pub struct RecordingScreens {
    pub shown: Vec<Shown>,
    initials: String,
}

impl RecordingScreens {
    pub fn new(initials: &str) -> Self {
        Self {
            shown: Vec::new(),
            initials: initials.to_string(),
        }
    }
}

impl Screens for RecordingScreens {
    fn end_screen(&mut self, _console: &mut Console, screen: &EndScreen<'_>) {
        self.shown.push(Shown::End {
            won: screen.won,
            detail: screen.detail.to_string(),
            record: screen.record,
        });
    }

    fn enter_initials(&mut self, _console: &mut Console, _prompt: &InitialsPrompt<'_>) -> String {
        self.shown.push(Shown::Initials);
        self.initials.clone()
    }

    fn next_stage(&mut self, _console: &mut Console) {
        self.shown.push(Shown::NextStage);
    }

    fn unavailable(&mut self, _console: &mut Console, year: Year) {
        self.shown.push(Shown::Unavailable(year));
    }

    fn cutscene(&mut self, _console: &mut Console, id: &str) {
        self.shown.push(Shown::Cutscene(id.to_string()));
    }

    fn story_final(&mut self, _console: &mut Console, run: &StoryRun) {
        self.shown.push(Shown::StoryFinal(*run));
    }

    fn story_not_ranked(&mut self, _console: &mut Console, final_score: u64) {
        self.shown.push(Shown::NotRanked(final_score));
    }
}
