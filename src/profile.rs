//! Player profile persisted across sessions: name, theme, difficulty.

use crate::game::Difficulty;
use crate::theme::Theme;
use crate::utils::persistence;
use serde::{Deserialize, Serialize};
use std::io;

const PROFILE_FILE: &str = "profile.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub theme: Theme,
    pub difficulty: Difficulty,
    /// Escalate the tier from cumulative score during a run.
    pub auto_difficulty: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            theme: Theme::default(),
            difficulty: Difficulty::Easy,
            auto_difficulty: true,
        }
    }
}

impl Profile {
    pub fn load() -> Self {
        persistence::load_json_or_default(PROFILE_FILE)
    }

    pub fn save(&self) -> io::Result<()> {
        persistence::save_json(PROFILE_FILE, self)
    }
}
