//! High score tables
//!
//! One top-10 table per (board, difficulty). Boards are the story run and
//! each year's minigame. Persisted to `highscores.json` in the data directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::games::Year;
use crate::persistence;
use crate::settings::Difficulty;

/// Maximum number of high scores to keep per table
pub const MAX_HIGH_SCORES: usize = 10;

/// Initials are always exactly this many characters
pub const INITIALS_LEN: usize = 3;

/// Digits shown for a score
pub const SCORE_DIGITS: usize = 7;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
    pub initials: String,
}

/// One leaderboard, sorted by score descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// A score enters while the table has room, or when it beats the 10th entry
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert after every entry with an equal or higher score.
    ///
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn insert(&mut self, score: u64, initials: &str) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            ScoreEntry {
                score,
                initials: normalize_initials(initials),
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Pad or cut to three characters; blanks and control characters become spaces
fn normalize_initials(initials: &str) -> String {
    let mut chars = initials.chars();
    (0..INITIALS_LEN)
        .map(|_| match chars.next() {
            Some(c) if !c.is_control() => c.to_ascii_uppercase(),
            _ => ' ',
        })
        .collect()
}

/// Zero-padded seven digit score text
pub fn format_score(score: u64) -> String {
    format!("{:0width$}", score, width = SCORE_DIGITS)
}

/// Which leaderboard a table belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Board {
    Story,
    Year(Year),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTable {
    board: Board,
    difficulty: Difficulty,
    table: ScoreTable,
}

/// Every leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    tables: Vec<StoredTable>,
}

impl HighScores {
    /// File name inside the data directory
    pub const FILE_NAME: &'static str = "highscores.json";

    pub fn new() -> Self {
        Self::default()
    }

    /// Table for a board/difficulty; empty if never played
    pub fn table(&self, board: Board, difficulty: Difficulty) -> ScoreTable {
        self.find(board, difficulty)
            .map(|stored| stored.table.clone())
            .unwrap_or_default()
    }

    pub fn qualifies(&self, board: Board, difficulty: Difficulty, score: u64) -> bool {
        self.find(board, difficulty)
            .is_none_or(|stored| stored.table.qualifies(score))
    }

    pub fn insert(
        &mut self,
        board: Board,
        difficulty: Difficulty,
        score: u64,
        initials: &str,
    ) -> Option<usize> {
        let index = match self
            .tables
            .iter()
            .position(|t| t.board == board && t.difficulty == difficulty)
        {
            Some(index) => index,
            None => {
                self.tables.push(StoredTable {
                    board,
                    difficulty,
                    table: ScoreTable::new(),
                });
                self.tables.len() - 1
            }
        };
        let rank = self.tables[index].table.insert(score, initials);
        if let Some(rank) = rank {
            log::info!(
                "High score {} ranked #{} on {:?}/{}",
                format_score(score),
                rank,
                board,
                difficulty.as_str()
            );
        }
        rank
    }

    fn find(&self, board: Board, difficulty: Difficulty) -> Option<&StoredTable> {
        self.tables
            .iter()
            .find(|t| t.board == board && t.difficulty == difficulty)
    }

    /// Load every table, starting fresh on a missing or damaged file
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<HighScores>(path) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high score tables", scores.tables.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("High scores {} unusable ({}), starting fresh", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> persistence::Result<()> {
        persistence::save_json(path, self)?;
        log::info!("High scores saved ({} tables)", self.tables.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> ScoreTable {
        let mut table = ScoreTable::new();
        for i in 1..=10u64 {
            table.insert(i * 100, "AAA");
        }
        table
    }

    #[test]
    fn test_qualifies() {
        let table = ScoreTable::new();
        assert!(table.qualifies(0));

        let table = full_table();
        assert!(!table.qualifies(100));
        assert!(!table.qualifies(50));
        assert!(table.qualifies(101));
    }

    #[test]
    fn test_insert_sorted_and_truncated() {
        let mut table = full_table();
        assert_eq!(table.insert(550, "BOB"), Some(6));
        assert_eq!(table.entries().len(), MAX_HIGH_SCORES);
        assert_eq!(table.top_score(), Some(1000));
        assert_eq!(table.entries().last().map(|e| e.score), Some(200));
        assert!(table.entries().windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(table.insert(100, "LOW"), None);
    }

    #[test]
    fn test_equal_scores_keep_older_first() {
        let mut table = ScoreTable::new();
        table.insert(500, "OLD");
        assert_eq!(table.insert(500, "NEW"), Some(2));
        assert_eq!(table.entries()[0].initials, "OLD");
        assert_eq!(table.entries()[1].initials, "NEW");
    }

    #[test]
    fn test_initials_normalized() {
        let mut table = ScoreTable::new();
        table.insert(1, "a");
        table.insert(2, "");
        table.insert(3, "ABCD");
        let initials: Vec<&str> = table.entries().iter().map(|e| e.initials.as_str()).collect();
        assert_eq!(initials, vec!["ABC", "   ", "A  "]);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0), "0000000");
        assert_eq!(format_score(50_000), "0050000");
        assert_eq!(format_score(12_345_678), "12345678");
    }

    #[test]
    fn test_boards_are_separate() {
        let mut scores = HighScores::new();
        scores.insert(Board::Story, Difficulty::Normal, 900, "STO");
        scores.insert(Board::Year(Year::Y1972), Difficulty::Normal, 100, "PON");
        scores.insert(Board::Year(Year::Y1972), Difficulty::Hard, 200, "HRD");

        assert_eq!(
            scores.table(Board::Story, Difficulty::Normal).top_score(),
            Some(900)
        );
        assert_eq!(
            scores
                .table(Board::Year(Year::Y1972), Difficulty::Hard)
                .top_score(),
            Some(200)
        );
        assert!(scores.table(Board::Story, Difficulty::Easy).is_empty());
        assert!(scores.qualifies(Board::Year(Year::Y1979), Difficulty::Easy, 0));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HighScores::FILE_NAME);

        let mut scores = HighScores::new();
        scores.insert(Board::Year(Year::Y1979), Difficulty::Easy, 4321, "JOE");
        scores.save(&path).unwrap();

        let loaded = HighScores::load(&path);
        let table = loaded.table(Board::Year(Year::Y1979), Difficulty::Easy);
        assert_eq!(table.entries()[0].initials, "JOE");
        assert_eq!(table.top_score(), Some(4321));
    }

    #[test]
    fn test_damaged_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HighScores::FILE_NAME);
        std::fs::write(&path, "not json").unwrap();
        assert!(HighScores::load(&path).table(Board::Story, Difficulty::Normal).is_empty());
    }
}
