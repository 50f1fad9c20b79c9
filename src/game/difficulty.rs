//! Difficulty tiers and frame-delay scaling.

use serde::{Deserialize, Serialize};

/// Session difficulty. Ordered so auto-escalation can compare tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Difficulty::Easy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Lowercase identifier used as the leaderboard storage key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Frame delay at length 1, in milliseconds.
    pub fn base_frame_ms(&self) -> u64 {
        match self {
            Self::Easy => 150,
            Self::Medium => 120,
            Self::Hard => 90,
        }
    }

    /// Floor the frame delay never drops below.
    pub fn min_frame_ms(&self) -> u64 {
        match self {
            Self::Easy => 80,
            Self::Medium => 60,
            Self::Hard => 40,
        }
    }

    /// Static obstacles placed for the session.
    pub fn obstacle_count(&self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 6,
            Self::Hard => 12,
        }
    }

    /// Rival snakes kept on the board.
    pub fn npc_count(&self) -> usize {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// Apples the top-up timer maintains on the board.
    pub fn apple_target(&self) -> usize {
        match self {
            Self::Easy => 3,
            Self::Medium => 3,
            Self::Hard => 4,
        }
    }

    /// Tier a cumulative score escalates to when auto-difficulty is on.
    pub fn for_score(score: u32) -> Self {
        if score >= 50 {
            Self::Hard
        } else if score >= 20 {
            Self::Medium
        } else {
            Self::Easy
        }
    }
}

/// Current frame delay for a snake of `length` at `tier`: linear speed-up
/// with length, floored at the tier minimum.
pub fn speed_delay(length: usize, tier: Difficulty) -> u64 {
    let scaled = tier.base_frame_ms() as i64 - (length as i64 - 1) * 2;
    scaled.max(tier.min_frame_ms() as i64) as u64
}
