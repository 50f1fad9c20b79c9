//! Tuning constants for the simulation core.

/// Board width and height in tiles (the grid is always square and toroidal).
pub const TILE_COUNT: i16 = 20;

/// Uniform draws attempted before a placement gives up ("board full").
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Ticks of reduced frame delay granted by a speed apple.
pub const SPEED_BOOST_TICKS: u32 = 40;

/// Frame delay while a speed boost is active. The effective delay is the
/// minimum of this and the length-scaled delay.
pub const BOOST_FRAME_MS: u64 = 70;

/// Ticks of collision immunity granted by a ghost apple.
pub const GHOST_TICKS: u32 = 40;

/// Ticks between an NPC's death and its replacement spawning.
pub const NPC_RESPAWN_TICKS: u32 = 30;

/// Ticks between apple top-up checks.
pub const APPLE_TOPUP_TICKS: u32 = 50;

/// NPC body length at which chasing the player becomes possible.
pub const NPC_CHASE_LEN: usize = 5;

/// Chase probability gained per body segment past [`NPC_CHASE_LEN`].
pub const NPC_CHASE_P_PER_SEGMENT: f64 = 0.04;

/// Upper bound on the chase probability.
pub const NPC_CHASE_P_MAX: f64 = 0.5;

/// Probability that an NPC's candidate order is shuffled on a given tick,
/// keeping seek motion from being fully deterministic.
pub const NPC_SHUFFLE_P: f64 = 0.15;
