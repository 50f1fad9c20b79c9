//! The explicit game-state aggregate.
//!
//! All board entities live here; nothing in the core is module-level
//! mutable state, and nothing here schedules its own timers. The host owns
//! one `GameState`, steers it with [`GameState::set_direction`], and hands
//! it to [`crate::game::step::step`] once per frame interval.

use super::board;
use super::constants::{APPLE_TOPUP_TICKS, BOOST_FRAME_MS, TILE_COUNT};
use super::difficulty::Difficulty;
use super::npc::BehaviorMode;
use super::types::{Apple, Direction, GameOverCause, Npc, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Run phase. Pausing is an orthogonal flag, not a phase: a paused run is
/// still `Running` and resumes with all state intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    Stopped,
}

/// Everything the simulation mutates, plus the timers that drive respawns
/// and apple top-ups. Mutated only inside a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tile_count: i16,
    pub difficulty: Difficulty,
    /// Escalate the tier from cumulative score when set.
    pub auto_difficulty: bool,
    pub npc_mode: BehaviorMode,

    pub phase: Phase,
    pub paused: bool,
    pub over: Option<GameOverCause>,

    /// Player body, head at the front (index 0).
    pub snake: VecDeque<Point>,
    /// `None` until the first steering input arrives.
    pub velocity: Option<Direction>,
    /// Pending length increase not yet reflected by tail retention.
    pub growth: u32,
    pub score: u32,

    pub apples: Vec<Apple>,
    pub obstacles: Vec<Point>,
    pub npcs: Vec<Npc>,

    /// Remaining ticks of the speed boost.
    pub speed_ticks: u32,
    /// Remaining ticks of ghost immunity.
    pub ghost_ticks: u32,

    /// Frame delay derived from length and tier.
    pub frame_delay_ms: u64,

    /// Scheduled NPC respawns, as countdown timers in ticks. Ticked only
    /// while the run is live and unpaused, so a timer can never fire into a
    /// finished run.
    pub npc_respawns: Vec<u32>,
    /// Countdown until the next apple top-up check.
    pub apple_topup: u32,

    pub tick_count: u64,
}

impl GameState {
    /// A fresh run: the player is a single segment in the board centre, not
    /// yet moving, with apples, obstacles, and stationary NPCs placed for
    /// the tier.
    pub fn new<R: Rng>(difficulty: Difficulty, auto_difficulty: bool, rng: &mut R) -> Self {
        let tile_count = TILE_COUNT;
        let centre = Point::new(tile_count / 2, tile_count / 2);

        let mut state = Self {
            tile_count,
            difficulty,
            auto_difficulty,
            npc_mode: BehaviorMode::Seek,
            phase: Phase::Running,
            paused: false,
            over: None,
            snake: VecDeque::from([centre]),
            velocity: None,
            growth: 0,
            score: 0,
            apples: Vec::new(),
            obstacles: Vec::new(),
            npcs: Vec::new(),
            speed_ticks: 0,
            ghost_ticks: 0,
            frame_delay_ms: difficulty.base_frame_ms(),
            npc_respawns: Vec::new(),
            apple_topup: APPLE_TOPUP_TICKS,
            tick_count: 0,
        };
        state.populate(rng);
        state
    }

    /// Place the session's obstacles, apples, and NPC spawns on free cells.
    /// A full board degrades to fewer entities, never an error.
    fn populate<R: Rng>(&mut self, rng: &mut R) {
        for _ in 0..self.difficulty.obstacle_count() {
            let spot = board::random_obstacle(
                self.tile_count,
                self.all_segments(),
                &self.apples,
                &self.obstacles,
                rng,
            );
            if let Some(p) = spot {
                self.obstacles.push(p);
            }
        }
        for _ in 0..self.difficulty.apple_target() {
            let apple = board::random_apple(
                self.tile_count,
                self.all_segments(),
                &self.apples,
                &self.obstacles,
                rng,
            );
            if let Some(a) = apple {
                self.apples.push(a);
            }
        }
        for _ in 0..self.difficulty.npc_count() {
            let spot = board::free_cell(
                self.tile_count,
                self.all_segments(),
                &self.apples,
                &self.obstacles,
                rng,
            );
            if let Some(p) = spot {
                self.npcs.push(Npc::new(p));
            }
        }
    }

    pub fn head(&self) -> Point {
        self.snake[0]
    }

    /// Every live segment on the board: the player plus all NPC bodies.
    pub fn all_segments(&self) -> impl Iterator<Item = &Point> + Clone {
        self.snake
            .iter()
            .chain(self.npcs.iter().flat_map(|n| n.body.iter()))
    }

    /// Steer the player. A 180° flip is ignored once the body has a second
    /// segment to run back into; setting the current direction again is a
    /// no-op by construction.
    pub fn set_direction(&mut self, dir: Direction) {
        if self.snake.len() >= 2 && self.velocity == Some(dir.opposite()) {
            return;
        }
        self.velocity = Some(dir);
    }

    /// Suspend or resume ticking. State is preserved either way; a stopped
    /// run cannot be paused.
    pub fn toggle_pause(&mut self) {
        if self.phase == Phase::Running {
            self.paused = !self.paused;
        }
    }

    pub fn is_over(&self) -> bool {
        self.over.is_some()
    }

    /// Delay before the next frame, honouring an active speed boost. The
    /// boost never slows a snake already faster than the boost delay.
    pub fn effective_delay_ms(&self) -> u64 {
        if self.speed_ticks > 0 {
            self.frame_delay_ms.min(BOOST_FRAME_MS)
        } else {
            self.frame_delay_ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn new_state(difficulty: Difficulty) -> GameState {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        GameState::new(difficulty, false, &mut rng)
    }

    #[test]
    fn test_new_run_defaults() {
        let state = new_state(Difficulty::Easy);
        assert_eq!(state.phase, Phase::Running);
        assert!(!state.paused);
        assert!(state.over.is_none());
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.head(), Point::new(10, 10));
        assert!(state.velocity.is_none());
        assert_eq!(state.score, 0);
        assert_eq!(state.growth, 0);
        assert_eq!(state.frame_delay_ms, 150);
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn test_populate_matches_tier_counts() {
        for tier in Difficulty::ALL {
            let state = new_state(tier);
            assert_eq!(state.obstacles.len(), tier.obstacle_count());
            assert_eq!(state.apples.len(), tier.apple_target());
            assert_eq!(state.npcs.len(), tier.npc_count());
        }
    }

    #[test]
    fn test_populate_places_nothing_on_anything_else() {
        let state = new_state(Difficulty::Hard);
        let mut seen = Vec::new();
        seen.extend(state.all_segments().copied());
        seen.extend(state.apples.iter().map(|a| a.pos));
        seen.extend(state.obstacles.iter().copied());
        let before = seen.len();
        seen.sort_by_key(|p| (p.x, p.y));
        seen.dedup();
        assert_eq!(seen.len(), before, "two entities share a cell");
    }

    #[test]
    fn test_set_direction_rejects_reversal_with_body() {
        let mut state = new_state(Difficulty::Easy);
        state.snake.push_back(Point::new(9, 10));
        state.velocity = Some(Direction::Right);

        state.set_direction(Direction::Left);
        assert_eq!(state.velocity, Some(Direction::Right));

        state.set_direction(Direction::Up);
        assert_eq!(state.velocity, Some(Direction::Up));
    }

    #[test]
    fn test_set_direction_allows_reversal_at_length_one() {
        let mut state = new_state(Difficulty::Easy);
        state.velocity = Some(Direction::Right);
        state.set_direction(Direction::Left);
        assert_eq!(state.velocity, Some(Direction::Left));
    }

    #[test]
    fn test_toggle_pause_preserves_state() {
        let mut state = new_state(Difficulty::Easy);
        let snapshot = state.snake.clone();
        state.toggle_pause();
        assert!(state.paused);
        assert_eq!(state.snake, snapshot);
        state.toggle_pause();
        assert!(!state.paused);
    }

    #[test]
    fn test_toggle_pause_noop_when_stopped() {
        let mut state = new_state(Difficulty::Easy);
        state.phase = Phase::Stopped;
        state.toggle_pause();
        assert!(!state.paused);
    }

    #[test]
    fn test_effective_delay_honours_boost() {
        let mut state = new_state(Difficulty::Easy);
        assert_eq!(state.effective_delay_ms(), 150);
        state.speed_ticks = 10;
        assert_eq!(state.effective_delay_ms(), BOOST_FRAME_MS);
        // an already-faster snake is not slowed by the boost
        state.frame_delay_ms = 50;
        assert_eq!(state.effective_delay_ms(), 50);
    }
}
