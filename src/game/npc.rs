//! NPC steering: one single-step decision per snake per tick.

use super::constants::{
    NPC_CHASE_LEN, NPC_CHASE_P_MAX, NPC_CHASE_P_PER_SEGMENT, NPC_SHUFFLE_P,
};
use super::types::{Apple, Direction, Npc, Point};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How NPC snakes pick their next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorMode {
    /// Uniformly shuffled directions; the first unblocked one wins.
    Random,
    /// Nearest-apple seeking, with length-scaled player chasing.
    Seek,
}

/// Signed toroidal displacement from `a` to `b` on one axis: the shortest
/// way around the wrap, in `(-tile_count/2, tile_count/2]`.
pub fn toroidal_diff(a: i16, b: i16, tile_count: i16) -> i16 {
    let mut d = (b - a).rem_euclid(tile_count);
    if d > tile_count / 2 {
        d -= tile_count;
    }
    d
}

/// Manhattan distance under the toroidal metric.
pub fn toroidal_manhattan(a: Point, b: Point, tile_count: i16) -> i16 {
    toroidal_diff(a.x, b.x, tile_count).abs() + toroidal_diff(a.y, b.y, tile_count).abs()
}

/// Pick a velocity for `npc`.
///
/// `npcs` is every NPC on the board including `npc` itself; any snake
/// segment or obstacle blocks, apples never do. When every candidate cell
/// is blocked the current velocity is returned unchanged, so a trapped NPC
/// keeps running straight into its own collision next tick.
pub fn choose_velocity<R: Rng>(
    npc: &Npc,
    player: &VecDeque<Point>,
    npcs: &[Npc],
    apples: &[Apple],
    obstacles: &[Point],
    tile_count: i16,
    mode: BehaviorMode,
    rng: &mut R,
) -> Option<Direction> {
    let head = npc.head();

    let candidates = match mode {
        BehaviorMode::Random => shuffled_directions(rng),
        BehaviorMode::Seek => match pick_target(npc, player, apples, tile_count, rng) {
            Some(target) => ordered_candidates(head, target, tile_count, rng),
            // nothing to seek: wander
            None => shuffled_directions(rng),
        },
    };

    for dir in candidates {
        let cell = head.step(dir, tile_count);
        if !blocked(cell, player, npcs, obstacles) {
            return Some(dir);
        }
    }
    npc.velocity
}

fn shuffled_directions<R: Rng>(rng: &mut R) -> Vec<Direction> {
    let mut dirs = Direction::ALL.to_vec();
    dirs.shuffle(rng);
    dirs
}

/// Nearest apple by toroidal Manhattan distance, or the player's head once
/// the NPC is long enough; the chase probability grows with its length.
fn pick_target<R: Rng>(
    npc: &Npc,
    player: &VecDeque<Point>,
    apples: &[Apple],
    tile_count: i16,
    rng: &mut R,
) -> Option<Point> {
    if npc.body.len() >= NPC_CHASE_LEN {
        let p = ((npc.body.len() - NPC_CHASE_LEN) as f64 * NPC_CHASE_P_PER_SEGMENT)
            .min(NPC_CHASE_P_MAX);
        if p > 0.0 && rng.gen_bool(p) {
            return player.front().copied();
        }
    }
    let head = npc.head();
    apples
        .iter()
        .map(|a| a.pos)
        .min_by_key(|p| toroidal_manhattan(head, *p, tile_count))
}

/// Candidate order toward `target`: the axis with the larger displacement
/// first, then the orthogonal axis, then their reversals. Occasionally the
/// whole order is shuffled so seek motion stays a little unpredictable.
fn ordered_candidates<R: Rng>(
    head: Point,
    target: Point,
    tile_count: i16,
    rng: &mut R,
) -> Vec<Direction> {
    let dx = toroidal_diff(head.x, target.x, tile_count);
    let dy = toroidal_diff(head.y, target.y, tile_count);

    let horiz = if dx >= 0 {
        Direction::Right
    } else {
        Direction::Left
    };
    let vert = if dy >= 0 { Direction::Down } else { Direction::Up };

    let mut dirs = if dx.abs() >= dy.abs() {
        vec![horiz, vert, horiz.opposite(), vert.opposite()]
    } else {
        vec![vert, horiz, vert.opposite(), horiz.opposite()]
    };
    if rng.gen_bool(NPC_SHUFFLE_P) {
        dirs.shuffle(rng);
    }
    dirs
}

fn blocked(cell: Point, player: &VecDeque<Point>, npcs: &[Npc], obstacles: &[Point]) -> bool {
    player.contains(&cell)
        || npcs.iter().any(|n| n.body.contains(&cell))
        || obstacles.contains(&cell)
}
