//! Serpent's Path - Terminal Snake Arcade Library
//!
//! This module exposes the simulation core and support modules for testing
//! and external use. The terminal front end lives in the binary.

pub mod build_info;
pub mod game;
pub mod leaderboard;
pub mod net;
pub mod profile;
pub mod save_manager;
pub mod theme;
pub mod ui;
pub mod utils;

pub use game::{step, Difficulty, GameState, StepOutcome};
