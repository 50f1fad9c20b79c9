//! The per-tick state transition.
//!
//! One call advances the whole board by one cell: the player, every NPC,
//! apple consumption, collision resolution, respawn timers, and speed
//! scaling. The host drives it; the core schedules nothing on its own.

use super::board;
use super::constants::{APPLE_TOPUP_TICKS, NPC_RESPAWN_TICKS};
use super::difficulty::{speed_delay, Difficulty};
use super::npc::choose_velocity;
use super::state::{GameState, Phase};
use super::types::{Apple, AppleKind, Direction, GameOverCause, Npc, Point};
use rand::Rng;

/// Something that happened during a tick. The host maps these to the
/// message log; the core never touches UI types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// The player ate an apple; `score` is the new total.
    AppleEaten { kind: AppleKind, score: u32 },
    /// An NPC ate an apple.
    NpcAppleEaten { kind: AppleKind },
    /// An NPC collided fatally; `recycled` of its cells became apples.
    NpcDied { recycled: usize },
    NpcSpawned,
    /// A scheduled spawn found no free cell and was dropped.
    NpcSpawnSkipped,
    /// Auto-difficulty promoted the session to a faster tier.
    DifficultyEscalated { tier: Difficulty },
    GameOver { cause: GameOverCause },
}

/// Whether the run continues after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    GameOver(GameOverCause),
}

/// Outcome plus the tick's event stream.
#[derive(Debug)]
pub struct StepReport {
    pub outcome: StepOutcome,
    pub events: Vec<TickEvent>,
}

impl StepReport {
    fn running(events: Vec<TickEvent>) -> Self {
        Self {
            outcome: StepOutcome::Continue,
            events,
        }
    }
}

/// Advance the simulation by one tick.
///
/// Paused states are left untouched. A fatal player collision stops the run
/// immediately: the report carries the cause and no further entity is
/// mutated within that tick. NPC deaths are local: the rest of the tick
/// proceeds, the corpse recycles into apples, and a respawn is scheduled.
pub fn step<R: Rng>(state: &mut GameState, rng: &mut R) -> StepReport {
    let mut events = Vec::new();

    if let Some(cause) = state.over {
        return StepReport {
            outcome: StepOutcome::GameOver(cause),
            events,
        };
    }
    if state.paused {
        return StepReport::running(events);
    }

    state.tick_count += 1;

    // timed modifiers burn down one tick at a time
    state.speed_ticks = state.speed_ticks.saturating_sub(1);
    state.ghost_ticks = state.ghost_ticks.saturating_sub(1);

    steer_npcs(state, rng);

    let len_before = state.snake.len();

    if let Some(dir) = state.velocity {
        let new_head = state.head().step(dir, state.tile_count);

        if state.ghost_ticks == 0 {
            if let Some(cause) = player_collision(state, new_head) {
                return game_over(state, cause, events);
            }
        }

        state.snake.push_front(new_head);

        if let Some(kind) = consume_apple(state, new_head, rng) {
            state.score += kind.score();
            state.growth += kind.growth();
            state.speed_ticks += kind.speed_ticks();
            state.ghost_ticks += kind.ghost_ticks();
            events.push(TickEvent::AppleEaten {
                kind,
                score: state.score,
            });
        }

        if state.growth > 0 {
            state.growth -= 1;
        } else {
            state.snake.pop_back();
        }
    }

    if let Some(cause) = advance_npcs(state, rng, &mut events) {
        return game_over(state, cause, events);
    }

    run_spawn_timers(state, rng, &mut events);

    if state.auto_difficulty {
        escalate_difficulty(state, rng, &mut events);
    }

    if state.snake.len() != len_before {
        state.frame_delay_ms = speed_delay(state.snake.len(), state.difficulty);
    }

    StepReport::running(events)
}

fn game_over(state: &mut GameState, cause: GameOverCause, mut events: Vec<TickEvent>) -> StepReport {
    state.phase = Phase::Stopped;
    state.over = Some(cause);
    events.push(TickEvent::GameOver { cause });
    StepReport {
        outcome: StepOutcome::GameOver(cause),
        events,
    }
}

/// Fatal cells for the player's incoming head: its own body, any NPC body,
/// any obstacle. Checked before the head is inserted.
fn player_collision(state: &GameState, head: Point) -> Option<GameOverCause> {
    if state.snake.contains(&head) {
        Some(GameOverCause::HitSelf)
    } else if state.npcs.iter().any(|n| n.body.contains(&head)) {
        Some(GameOverCause::HitNpc)
    } else if state.obstacles.contains(&head) {
        Some(GameOverCause::HitObstacle)
    } else {
        None
    }
}

/// Let every NPC pick a velocity before anything on the board moves.
fn steer_npcs<R: Rng>(state: &mut GameState, rng: &mut R) {
    let choices: Vec<Option<Direction>> = state
        .npcs
        .iter()
        .map(|n| {
            choose_velocity(
                n,
                &state.snake,
                &state.npcs,
                &state.apples,
                &state.obstacles,
                state.tile_count,
                state.npc_mode,
                rng,
            )
        })
        .collect();
    for (npc, choice) in state.npcs.iter_mut().zip(choices) {
        npc.velocity = choice;
    }
}

/// Consume the apple under `head`, if any, and refresh the slot. A full
/// board drops the slot instead of replacing it. Returns the eaten kind;
/// effect application is the caller's business since player and NPC differ.
fn consume_apple<R: Rng>(state: &mut GameState, head: Point, rng: &mut R) -> Option<AppleKind> {
    let idx = state.apples.iter().position(|a| a.pos == head)?;
    let kind = state.apples[idx].kind;
    let fresh = board::random_apple(
        state.tile_count,
        state.all_segments(),
        &state.apples,
        &state.obstacles,
        rng,
    );
    match fresh {
        Some(apple) => state.apples[idx] = apple,
        None => {
            state.apples.remove(idx);
        }
    }
    Some(kind)
}

/// Advance each NPC in stored order through the same movement rules as the
/// player. Returns a cause when an NPC ends the whole run by ramming the
/// player's head; every other collision kills only that NPC.
fn advance_npcs<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    events: &mut Vec<TickEvent>,
) -> Option<GameOverCause> {
    let mut i = 0;
    while i < state.npcs.len() {
        let Some(dir) = state.npcs[i].velocity else {
            i += 1;
            continue;
        };
        let new_head = state.npcs[i].head().step(dir, state.tile_count);

        if new_head == state.head() {
            return Some(GameOverCause::RammedByNpc);
        }

        let fatal = state.snake.contains(&new_head)
            || state
                .npcs
                .iter()
                .any(|other| other.body.contains(&new_head))
            || state.obstacles.contains(&new_head);

        if fatal {
            let corpse = state.npcs.remove(i);
            let recycled = recycle_corpse(state, corpse);
            events.push(TickEvent::NpcDied { recycled });
            state.npc_respawns.push(NPC_RESPAWN_TICKS);
            continue;
        }

        state.npcs[i].body.push_front(new_head);

        if let Some(kind) = consume_apple(state, new_head, rng) {
            let npc = &mut state.npcs[i];
            npc.score += kind.score();
            npc.growth += kind.growth();
            events.push(TickEvent::NpcAppleEaten { kind });
        }

        let npc = &mut state.npcs[i];
        if npc.growth > 0 {
            npc.growth -= 1;
        } else {
            npc.body.pop_back();
        }

        i += 1;
    }
    None
}

/// A dead NPC decays into normal apples wherever its cells are free.
fn recycle_corpse(state: &mut GameState, corpse: Npc) -> usize {
    let mut recycled = 0;
    for cell in corpse.body {
        let occupied = board::is_occupied(
            cell.x,
            cell.y,
            state.all_segments(),
            &state.apples,
            &state.obstacles,
        );
        if !occupied {
            state.apples.push(Apple {
                pos: cell,
                kind: AppleKind::Normal,
            });
            recycled += 1;
        }
    }
    recycled
}

/// Tick the respawn and apple top-up timers. Both only ever run from inside
/// a live tick, so neither can fire after the run has ended.
fn run_spawn_timers<R: Rng>(state: &mut GameState, rng: &mut R, events: &mut Vec<TickEvent>) {
    let mut due = 0;
    for timer in &mut state.npc_respawns {
        *timer -= 1;
        if *timer == 0 {
            due += 1;
        }
    }
    state.npc_respawns.retain(|t| *t > 0);

    for _ in 0..due {
        let spot = board::free_cell(
            state.tile_count,
            state.all_segments(),
            &state.apples,
            &state.obstacles,
            rng,
        );
        match spot {
            Some(p) => {
                state.npcs.push(Npc::new(p));
                events.push(TickEvent::NpcSpawned);
            }
            None => events.push(TickEvent::NpcSpawnSkipped),
        }
    }

    state.apple_topup = state.apple_topup.saturating_sub(1);
    if state.apple_topup == 0 {
        state.apple_topup = APPLE_TOPUP_TICKS;
        if state.apples.len() < state.difficulty.apple_target() {
            let apple = board::random_apple(
                state.tile_count,
                state.all_segments(),
                &state.apples,
                &state.obstacles,
                rng,
            );
            if let Some(a) = apple {
                state.apples.push(a);
            }
        }
    }
}

/// Promote the tier once the score crosses a threshold: faster floor, more
/// obstacles, more rivals. Existing entities stay where they are.
fn escalate_difficulty<R: Rng>(state: &mut GameState, rng: &mut R, events: &mut Vec<TickEvent>) {
    let tier = Difficulty::for_score(state.score);
    if tier <= state.difficulty {
        return;
    }
    state.difficulty = tier;
    state.frame_delay_ms = speed_delay(state.snake.len(), tier);

    while state.obstacles.len() < tier.obstacle_count() {
        let spot = board::random_obstacle(
            state.tile_count,
            state.all_segments(),
            &state.apples,
            &state.obstacles,
            rng,
        );
        match spot {
            Some(p) => state.obstacles.push(p),
            None => break,
        }
    }

    let live = state.npcs.len() + state.npc_respawns.len();
    for _ in live..tier.npc_count() {
        state.npc_respawns.push(NPC_RESPAWN_TICKS);
    }

    events.push(TickEvent::DifficultyEscalated { tier });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::VecDeque;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    /// A bare board: single-segment player at the centre, no apples,
    /// obstacles, or NPCs, moving right.
    fn bare_state() -> GameState {
        let mut state = GameState::new(Difficulty::Easy, false, &mut rng());
        state.apples.clear();
        state.obstacles.clear();
        state.npcs.clear();
        state.velocity = Some(Direction::Right);
        state
    }

    #[test]
    fn test_stationary_player_does_not_advance() {
        let mut state = bare_state();
        state.velocity = None;
        let head = state.head();

        let report = step(&mut state, &mut rng());

        assert_eq!(report.outcome, StepOutcome::Continue);
        assert_eq!(state.head(), head);
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_player_moves_one_cell() {
        let mut state = bare_state();
        let head = state.head();

        step(&mut state, &mut rng());

        assert_eq!(state.head(), Point::new(head.x + 1, head.y));
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_paused_tick_is_a_noop() {
        let mut state = bare_state();
        state.paused = true;
        let head = state.head();

        let report = step(&mut state, &mut rng());

        assert_eq!(report.outcome, StepOutcome::Continue);
        assert!(report.events.is_empty());
        assert_eq!(state.head(), head);
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn test_step_on_stopped_state_reports_the_cause() {
        let mut state = bare_state();
        state.phase = Phase::Stopped;
        state.over = Some(GameOverCause::HitObstacle);

        let report = step(&mut state, &mut rng());

        assert_eq!(
            report.outcome,
            StepOutcome::GameOver(GameOverCause::HitObstacle)
        );
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn test_eating_scores_grows_and_respawns_the_apple() {
        let mut state = bare_state();
        let head = state.head();
        state.apples.push(Apple {
            pos: Point::new(head.x + 1, head.y),
            kind: AppleKind::Normal,
        });

        let report = step(&mut state, &mut rng());

        assert_eq!(report.outcome, StepOutcome::Continue);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 2, "growth retains the tail");
        assert_eq!(state.apples.len(), 1, "the slot was refreshed");
        assert_ne!(state.apples[0].pos, state.head());
        assert!(!state.snake.contains(&state.apples[0].pos));
        assert!(report
            .events
            .contains(&TickEvent::AppleEaten {
                kind: AppleKind::Normal,
                score: 1
            }));
    }

    #[test]
    fn test_gold_apple_scores_five_and_grows_two() {
        let mut state = bare_state();
        let head = state.head();
        state.apples.push(Apple {
            pos: Point::new(head.x + 1, head.y),
            kind: AppleKind::Gold,
        });

        step(&mut state, &mut rng());
        assert_eq!(state.score, 5);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.growth, 1, "one growth tick still pending");

        state.apples.clear();
        step(&mut state, &mut rng());
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.growth, 0);
    }

    #[test]
    fn test_speed_apple_arms_the_boost() {
        let mut state = bare_state();
        let head = state.head();
        state.apples.push(Apple {
            pos: Point::new(head.x + 1, head.y),
            kind: AppleKind::Speed,
        });

        step(&mut state, &mut rng());

        assert!(state.speed_ticks > 0);
        assert!(state.effective_delay_ms() < state.frame_delay_ms);
    }

    #[test]
    fn test_ghost_apple_suppresses_fatal_collisions() {
        let mut state = bare_state();
        let head = state.head();
        state.ghost_ticks = 5;
        state.obstacles.push(Point::new(head.x + 1, head.y));

        let report = step(&mut state, &mut rng());

        assert_eq!(report.outcome, StepOutcome::Continue);
        assert_eq!(state.head(), Point::new(head.x + 1, head.y));
    }

    #[test]
    fn test_self_collision_stops_the_run_without_other_mutation() {
        let mut state = bare_state();
        // U-shape: moving right from (10,10) lands on (11,10), which is body
        state.snake = VecDeque::from([
            Point::new(10, 10),
            Point::new(10, 9),
            Point::new(11, 9),
            Point::new(11, 10),
            Point::new(11, 11),
        ]);
        state.apples.push(Apple {
            pos: Point::new(0, 0),
            kind: AppleKind::Normal,
        });
        state.obstacles.push(Point::new(5, 5));
        let apples_before = state.apples.clone();
        let obstacles_before = state.obstacles.clone();
        let snake_before = state.snake.clone();

        let report = step(&mut state, &mut rng());

        assert_eq!(report.outcome, StepOutcome::GameOver(GameOverCause::HitSelf));
        assert_eq!(state.phase, Phase::Stopped);
        assert_eq!(state.over, Some(GameOverCause::HitSelf));
        assert_eq!(state.apples, apples_before);
        assert_eq!(state.obstacles, obstacles_before);
        assert_eq!(state.snake, snake_before, "the head was never inserted");
    }

    #[test]
    fn test_tail_cell_is_fatal() {
        // the whole body blocks, tail included, so chasing one's own
        // tail ends the run
        let mut state = bare_state();
        state.snake = VecDeque::from([
            Point::new(10, 10),
            Point::new(10, 11),
            Point::new(11, 11),
            Point::new(11, 10),
        ]);

        let report = step(&mut state, &mut rng());

        assert_eq!(report.outcome, StepOutcome::GameOver(GameOverCause::HitSelf));
    }

    #[test]
    fn test_obstacle_collision_stops_the_run() {
        let mut state = bare_state();
        let head = state.head();
        state.obstacles.push(Point::new(head.x + 1, head.y));

        let report = step(&mut state, &mut rng());

        assert_eq!(
            report.outcome,
            StepOutcome::GameOver(GameOverCause::HitObstacle)
        );
    }

    #[test]
    fn test_player_hits_npc_body_and_dies() {
        let mut state = bare_state();
        let head = state.head();
        let mut npc = Npc::new(Point::new(head.x + 1, head.y + 5));
        npc.body.push_back(Point::new(head.x + 1, head.y));
        state.npcs.push(npc);

        let report = step(&mut state, &mut rng());

        assert_eq!(report.outcome, StepOutcome::GameOver(GameOverCause::HitNpc));
    }

    #[test]
    fn test_npc_ramming_player_head_ends_the_run() {
        let mut state = bare_state();
        state.velocity = None;
        let head = state.head();
        // rival one cell right of the player, pointed at it and walled in on
        // its other three sides: the steering finds every cell blocked,
        // keeps the stored velocity, and runs head-on into the player
        let mut npc = Npc::new(Point::new(head.x + 1, head.y));
        npc.velocity = Some(Direction::Left);
        state.npcs.push(npc);
        state.obstacles.extend([
            Point::new(head.x + 2, head.y),
            Point::new(head.x + 1, head.y - 1),
            Point::new(head.x + 1, head.y + 1),
        ]);

        let report = step(&mut state, &mut rng());

        assert_eq!(
            report.outcome,
            StepOutcome::GameOver(GameOverCause::RammedByNpc)
        );
    }

    #[test]
    fn test_npc_death_recycles_body_into_apples() {
        let mut state = bare_state();
        state.velocity = None;
        // rival at (4,4)-(4,5) walled in so its only fatal move is certain
        let mut npc = Npc::new(Point::new(4, 4));
        npc.body.push_back(Point::new(4, 5));
        npc.velocity = Some(Direction::Up);
        state.npcs.push(npc);
        state.obstacles.extend([
            Point::new(4, 3),
            Point::new(3, 4),
            Point::new(5, 4),
        ]);

        let report = step(&mut state, &mut rng());

        assert_eq!(report.outcome, StepOutcome::Continue);
        assert!(state.npcs.is_empty());
        assert!(state
            .apples
            .iter()
            .any(|a| a.pos == Point::new(4, 4) && a.kind == AppleKind::Normal));
        assert!(state
            .apples
            .iter()
            .any(|a| a.pos == Point::new(4, 5) && a.kind == AppleKind::Normal));
        assert!(report
            .events
            .contains(&TickEvent::NpcDied { recycled: 2 }));
        assert_eq!(state.npc_respawns.len(), 1, "a respawn was scheduled");
    }

    #[test]
    fn test_npc_recycling_skips_occupied_cells() {
        let mut state = bare_state();
        state.velocity = None;
        let mut npc = Npc::new(Point::new(4, 4));
        npc.body.push_back(Point::new(4, 5));
        npc.velocity = Some(Direction::Up);
        state.npcs.push(npc);
        state.obstacles.extend([
            Point::new(4, 3),
            Point::new(3, 4),
            Point::new(5, 4),
        ]);
        // an apple already sits under the corpse's second cell
        state.apples.push(Apple {
            pos: Point::new(4, 5),
            kind: AppleKind::Gold,
        });

        let report = step(&mut state, &mut rng());

        assert!(report.events.contains(&TickEvent::NpcDied { recycled: 1 }));
        let at_cell: Vec<_> = state
            .apples
            .iter()
            .filter(|a| a.pos == Point::new(4, 5))
            .collect();
        assert_eq!(at_cell.len(), 1, "no two apples share a coordinate");
        assert_eq!(at_cell[0].kind, AppleKind::Gold);
    }

    #[test]
    fn test_npc_respawn_timer_spawns_a_replacement() {
        let mut state = bare_state();
        state.velocity = None;
        state.npc_respawns.push(2);

        step(&mut state, &mut rng());
        assert!(state.npcs.is_empty());
        assert_eq!(state.npc_respawns, vec![1]);

        let report = step(&mut state, &mut rng());
        assert_eq!(state.npcs.len(), 1);
        assert!(state.npc_respawns.is_empty());
        assert!(report.events.contains(&TickEvent::NpcSpawned));
        assert!(state.npcs[0].velocity.is_none(), "spawns stationary");
    }

    #[test]
    fn test_apple_topup_refills_the_board() {
        let mut state = bare_state();
        state.velocity = None;
        state.apple_topup = 1;

        let _ = step(&mut state, &mut rng());

        assert_eq!(state.apples.len(), 1, "one apple topped up");
        assert_eq!(state.apple_topup, APPLE_TOPUP_TICKS);
    }

    #[test]
    fn test_auto_difficulty_escalates_from_score() {
        let mut state = bare_state();
        state.auto_difficulty = true;
        state.score = 50;

        let report = step(&mut state, &mut rng());

        assert_eq!(state.difficulty, Difficulty::Hard);
        assert_eq!(state.obstacles.len(), Difficulty::Hard.obstacle_count());
        assert!(report.events.contains(&TickEvent::DifficultyEscalated {
            tier: Difficulty::Hard
        }));
        // rivals arrive through the respawn pipeline
        assert_eq!(
            state.npc_respawns.len(),
            Difficulty::Hard.npc_count(),
            "replacement rivals scheduled"
        );
    }

    #[test]
    fn test_fixed_difficulty_never_escalates() {
        let mut state = bare_state();
        state.score = 500;

        step(&mut state, &mut rng());

        assert_eq!(state.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_modifier_counters_burn_down() {
        let mut state = bare_state();
        state.speed_ticks = 3;
        state.ghost_ticks = 1;

        step(&mut state, &mut rng());

        assert_eq!(state.speed_ticks, 2);
        assert_eq!(state.ghost_ticks, 0);
    }

    #[test]
    fn test_delay_recomputed_when_length_changes() {
        let mut state = bare_state();
        let head = state.head();
        state.apples.push(Apple {
            pos: Point::new(head.x + 1, head.y),
            kind: AppleKind::Normal,
        });
        assert_eq!(state.frame_delay_ms, 150);

        step(&mut state, &mut rng());

        // length 2 on Easy: 150 - 2 = 148
        assert_eq!(state.frame_delay_ms, 148);
    }
}
