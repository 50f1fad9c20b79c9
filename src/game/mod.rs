//! Simulation core: the board, the player, rival snakes, apples, obstacles.
//!
//! Everything here is pure with respect to I/O: randomness is an injected
//! `rand::Rng`, time is a tick count, and scheduling belongs to the host.

pub mod board;
pub mod constants;
pub mod difficulty;
pub mod npc;
pub mod state;
pub mod step;
pub mod types;

pub use difficulty::{speed_delay, Difficulty};
pub use npc::BehaviorMode;
pub use state::{GameState, Phase};
pub use step::{step, StepOutcome, StepReport, TickEvent};
pub use types::{Apple, AppleKind, Direction, GameOverCause, Npc, Point};
