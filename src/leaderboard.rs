//! Local leaderboard: top-10 score tables keyed by difficulty tier.

use crate::game::Difficulty;
use crate::utils::persistence;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;

/// Entries kept per tier.
pub const MAX_ENTRIES: usize = 10;

const SCORES_FILE: &str = "scores.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    /// Date of the run, `YYYY-MM-DD`.
    pub date: String,
}

/// All local tables, one per difficulty key.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    tables: HashMap<String, Vec<ScoreEntry>>,
}

impl Leaderboard {
    pub fn load() -> Self {
        persistence::load_json_or_default(SCORES_FILE)
    }

    pub fn save(&self) -> io::Result<()> {
        persistence::save_json(SCORES_FILE, self)
    }

    /// Append a score, keep the table sorted descending, and truncate to
    /// the top 10.
    pub fn record_score(&mut self, name: &str, score: u32, tier: Difficulty) {
        let entry = ScoreEntry {
            name: name.to_string(),
            score,
            date: Utc::now().format("%Y-%m-%d").to_string(),
        };
        self.insert(entry, tier);
    }

    fn insert(&mut self, entry: ScoreEntry, tier: Difficulty) {
        let table = self.tables.entry(tier.key().to_string()).or_default();
        table.push(entry);
        table.sort_by(|a, b| b.score.cmp(&a.score));
        table.truncate(MAX_ENTRIES);
    }

    /// The tier's table, best first. Empty when no run has finished yet.
    pub fn top(&self, tier: Difficulty) -> &[ScoreEntry] {
        self.tables
            .get(tier.key())
            .map(|t| t.as_slice())
            .unwrap_or(&[])
    }

    /// Best score recorded for the tier, if any.
    pub fn best(&self, tier: Difficulty) -> Option<u32> {
        self.top(tier).first().map(|e| e.score)
    }
}
