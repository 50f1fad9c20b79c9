//! Occupancy queries and bounded random placement.

use super::constants::MAX_PLACEMENT_ATTEMPTS;
use super::types::{Apple, AppleKind, Point};
use rand::Rng;

/// True iff `(x, y)` is covered by any snake segment, apple, or obstacle.
///
/// Pure membership test over the union of the three sets. Callers that care
/// about every snake on the board pass the union of player and NPC segments.
pub fn is_occupied<'a, I>(x: i16, y: i16, segments: I, apples: &[Apple], obstacles: &[Point]) -> bool
where
    I: IntoIterator<Item = &'a Point>,
{
    segments.into_iter().any(|p| p.x == x && p.y == y)
        || apples.iter().any(|a| a.pos.x == x && a.pos.y == y)
        || obstacles.iter().any(|o| o.x == x && o.y == y)
}

/// Draw a free cell, or `None` once the attempt bound is exhausted.
///
/// `None` means "no space available", not an error; callers skip the spawn
/// or shrink their list.
pub fn free_cell<'a, I, R>(
    tile_count: i16,
    segments: I,
    apples: &[Apple],
    obstacles: &[Point],
    rng: &mut R,
) -> Option<Point>
where
    I: IntoIterator<Item = &'a Point> + Clone,
    R: Rng,
{
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = rng.gen_range(0..tile_count);
        let y = rng.gen_range(0..tile_count);
        if !is_occupied(x, y, segments.clone(), apples, obstacles) {
            return Some(Point { x, y });
        }
    }
    None
}

/// A fresh apple on a free cell, with its kind rolled from the threshold
/// table, or `None` when the board has no room.
pub fn random_apple<'a, I, R>(
    tile_count: i16,
    segments: I,
    apples: &[Apple],
    obstacles: &[Point],
    rng: &mut R,
) -> Option<Apple>
where
    I: IntoIterator<Item = &'a Point> + Clone,
    R: Rng,
{
    let pos = free_cell(tile_count, segments, apples, obstacles, rng)?;
    Some(Apple {
        pos,
        kind: AppleKind::roll(rng),
    })
}

/// A fresh obstacle cell; the same bounded search without a kind.
pub fn random_obstacle<'a, I, R>(
    tile_count: i16,
    segments: I,
    apples: &[Apple],
    obstacles: &[Point],
    rng: &mut R,
) -> Option<Point>
where
    I: IntoIterator<Item = &'a Point> + Clone,
    R: Rng,
{
    free_cell(tile_count, segments, apples, obstacles, rng)
}
