//! Remote configuration: compiled-in defaults merged with an optionally
//! fetched JSON object. Never fails: a broken fetch or payload yields the
//! defaults unchanged.

use crate::net::http::fetch_with_retry;
use serde::{Deserialize, Serialize};

/// Environment variable naming the remote config URL, if any.
pub const CONFIG_URL_ENV: &str = "SERPENT_CONFIG_URL";

/// Tunables a server may override. Remote keys win; unknown remote keys are
/// ignored; missing keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Leaderboard endpoint. Empty disables online scores.
    pub high_score_api_url: String,
    /// Remote base URL for assets missing locally. Empty disables fallback.
    pub asset_base_url: String,
    /// Message of the day shown on the start screen.
    pub motd: String,
}

/// The config URL from the environment, if set.
pub fn config_url() -> Option<String> {
    std::env::var(CONFIG_URL_ENV).ok().filter(|s| !s.is_empty())
}

/// Fetch and merge. Any fetch or parse failure yields `defaults` unchanged.
pub fn load_remote_config(defaults: &RemoteConfig, url: Option<&str>) -> RemoteConfig {
    let Some(url) = url else {
        return defaults.clone();
    };
    let fetched = fetch_with_retry(url).and_then(|res| {
        res.into_json::<serde_json::Value>()
            .map_err(|e| e.into())
    });
    match fetched {
        Ok(remote) => merge(defaults, remote),
        Err(_) => defaults.clone(),
    }
}

/// Overlay remote keys onto the defaults, JS-object style: every key the
/// remote object carries replaces the default one.
fn merge(defaults: &RemoteConfig, remote: serde_json::Value) -> RemoteConfig {
    let mut base = match serde_json::to_value(defaults) {
        Ok(v) => v,
        Err(_) => return defaults.clone(),
    };
    if let (Some(base_map), Some(remote_map)) = (base.as_object_mut(), remote.as_object()) {
        for (key, value) in remote_map {
            base_map.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(base).unwrap_or_else(|_| defaults.clone())
}
