//! Network boundary: HTTP with retry/backoff, the remote leaderboard and
//! its offline queue, remote configuration, and asset fetching.
//!
//! Nothing in here is ever called from inside the simulation step. Failures
//! stay at this boundary: they are logged, queued, or defaulted, never
//! surfaced as gameplay errors.

pub mod assets;
pub mod http;
pub mod remote_config;
pub mod scores;
