//! Remote leaderboard client and the offline submission queue.
//!
//! Submissions that cannot be delivered are queued in ~/.serpent/ and
//! flushed oldest-first on the next launch, stopping at the first failure
//! so order is preserved.

use crate::game::Difficulty;
use crate::net::http::{fetch_with_retry, request_with_retry, TIMEOUT_MS};
use crate::utils::persistence;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::io;
use std::time::Duration;
use uuid::Uuid;

const UNSENT_FILE: &str = "unsent_scores.json";

/// One score delivery. The `id` lets the server drop duplicates when a
/// queued entry is retried after a half-delivered attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub id: Uuid,
    pub name: String,
    pub score: u32,
    pub difficulty: String,
    pub date: String,
}

impl ScoreSubmission {
    pub fn new(name: &str, score: u32, tier: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            score,
            difficulty: tier.key().to_string(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// A row of the remote leaderboard.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteScore {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Default, Deserialize)]
struct ScoreList {
    #[serde(default)]
    scores: Vec<RemoteScore>,
}

/// Fetch the remote top list.
pub fn fetch_top_scores(url: &str) -> Result<Vec<RemoteScore>, Box<dyn Error>> {
    let list: ScoreList = fetch_with_retry(url)?.into_json()?;
    Ok(list.scores)
}

/// POST one score.
pub fn submit_score(url: &str, entry: &ScoreSubmission) -> Result<(), Box<dyn Error>> {
    request_with_retry(|| {
        ureq::post(url)
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .set("User-Agent", "serpent")
            .send_json(entry)
    })?;
    Ok(())
}

pub fn load_unsent() -> Vec<ScoreSubmission> {
    persistence::load_json_or_default(UNSENT_FILE)
}

pub fn save_unsent(list: &[ScoreSubmission]) -> io::Result<()> {
    persistence::save_json(UNSENT_FILE, &list)
}

/// Append a submission that could not be delivered.
pub fn queue_unsent(entry: ScoreSubmission) -> io::Result<()> {
    let mut pending = load_unsent();
    pending.push(entry);
    save_unsent(&pending)
}

/// Submit now, queue on failure. Returns whether the delivery succeeded;
/// the caller never sees a network error.
pub fn submit_or_queue(url: &str, entry: ScoreSubmission) -> bool {
    match submit_score(url, &entry) {
        Ok(()) => true,
        Err(_) => {
            let _ = queue_unsent(entry);
            false
        }
    }
}

/// Flush queued submissions oldest-first, stopping at the first failure.
/// Returns how many were delivered; whatever remains is persisted back.
pub fn flush_unsent(url: &str) -> usize {
    let mut pending = load_unsent();
    if pending.is_empty() {
        return 0;
    }
    let mut sent = 0;
    while let Some(entry) = pending.first() {
        if submit_score(url, entry).is_err() {
            break;
        }
        pending.remove(0);
        sent += 1;
    }
    let _ = save_unsent(&pending);
    sent
}
