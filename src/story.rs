//! Story campaign
//!
//! Plays every year in order with a cutscene between stages. Stage scores
//! add up; losses count as retries and cost part of the final bonus.

use crate::games::{Catalog, Year};
use crate::highscores::Board;
use crate::launcher::{Launcher, Screens, StageResult};
use crate::sim::{Scheduler, SchedulerConfig};

/// Cutscene shown before each stage after the first, in story order
const STAGE_CUTSCENES: [&str; 8] = [
    "pre1978", "pre1979", "pre1981", "pre1982", "pre1983", "pre1989", "pre1991", "pre2013",
];

/// Running totals for one story attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoryRun {
    /// Sum of stage scores
    pub score: u64,
    /// Lost attempts across all stages
    pub retries: u32,
}

impl StoryRun {
    pub fn record_stage(&mut self, score: u64, retries: u32) {
        self.score = self.score.saturating_add(score);
        self.retries = self.retries.saturating_add(retries);
    }

    pub fn bonus(&self) -> u64 {
        retry_bonus(self.retries)
    }

    pub fn final_score(&self) -> u64 {
        self.score.saturating_add(self.bonus())
    }
}

/// Completion bonus, shrinking with every ten retries
pub fn retry_bonus(retries: u32) -> u64 {
    match retries {
        0 => 5_000_000,
        1..=10 => 4_000_000,
        11..=20 => 3_200_000,
        21..=30 => 2_600_000,
        31..=40 => 2_100_000,
        41..=50 => 1_700_000,
        51..=60 => 1_300_000,
        61..=70 => 900_000,
        71..=80 => 600_000,
        81..=90 => 350_000,
        91..=100 => 150_000,
        _ => 12_345,
    }
}

impl<C: Catalog, S: Screens> Launcher<C, S> {
    /// Play the whole campaign. Returns `None` if the player quit.
    pub fn run_story(&mut self) -> Option<StoryRun> {
        let settings = self.begin_launch();
        let mut scheduler = Scheduler::new(SchedulerConfig::story(self.config.debug));
        let mut run = StoryRun::default();
        log::info!("Story started ({})", settings.difficulty.as_str());

        self.screens.cutscene(&mut self.console, "intro");

        for (stage, year) in Year::ALL.into_iter().enumerate() {
            match self.run_story_stage(year, &settings, &mut scheduler) {
                StageResult::Cleared { score, retries } => run.record_stage(score, retries),
                StageResult::Unavailable => {
                    log::warn!("Story skips {}: no minigame available", year.number());
                }
                StageResult::Aborted => {
                    log::info!("Story abandoned at {}", year.number());
                    return None;
                }
            }

            if let Some(id) = STAGE_CUTSCENES.get(stage) {
                self.screens.cutscene(&mut self.console, id);
            }
        }

        self.screens.cutscene(&mut self.console, "ending");
        log::info!(
            "Story complete: base {} retries {} final {}",
            run.score,
            run.retries,
            run.final_score()
        );
        self.screens.story_final(&mut self.console, &run);

        let final_score = run.final_score();
        if self
            .high_scores
            .qualifies(Board::Story, settings.difficulty, final_score)
        {
            self.record_score(
                Board::Story,
                &settings,
                final_score,
                "STORY MODE COMPLETE",
                "",
            );
        } else {
            log::info!("Story score {} missed the table", final_score);
            self.screens.story_not_ranked(&mut self.console, final_score);
        }

        Some(run)
    }
}
