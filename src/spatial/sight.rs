//! Line of sight.
//!
//! [`cast_sight`] is the gameplay check: a Bresenham ray that stops at the
//! first wall, locked door or sight-blocking actor, optionally revealing what
//! it passes. [`light_reaches`] is a much cheaper two-leg test only good
//! enough to decide whether a light source spills onto a nearby tile.

use crate::config::FULL_LIGHT;
use crate::utils::BresenhamLine;
use crate::{Occupants, Position, TileFlags, TileGrid};

/// Casts a ray from `from` to `to`, returning whether it arrives.
///
/// With `reveal` set, every tile the ray steps on becomes visible and
/// revealed and has its light target raised to full. A non-blocking stepped
/// tile also reveals its 8 neighbours, so the walls framing a room show up
/// without rays of their own.
///
/// The ray fails at a blocking tile, or a tile holding a sight-blocking
/// actor, met before `to`. The tile at `from` is never checked. `to` itself
/// is always seen, so casting at a wall returns `true`. Stepping off the grid
/// fails.
pub fn cast_sight(
    grid: &mut TileGrid,
    occupants: &Occupants,
    from: Position,
    to: Position,
    reveal: bool,
) -> bool {
    for pos in BresenhamLine::new(from, to) {
        let Some(tile) = grid.get_mut(pos) else {
            return false;
        };
        let blocking = tile.blocks_movement();

        if reveal {
            tile.reveal();
            tile.light_target = FULL_LIGHT;
            if !blocking {
                for neighbour in pos.adjacent_positions() {
                    if let Some(tile) = grid.get_mut(neighbour) {
                        tile.reveal();
                    }
                }
            }
        }

        if pos == to {
            return true;
        }
        if pos != from && (blocking || occupants.blocks_sight(pos)) {
            return false;
        }
    }
    // The line always ends on `to`.
    true
}

/// Cells of the L-shaped path from `from` through `corner` to `to`.
fn l_path(from: Position, corner: Position, to: Position) -> impl Iterator<Item = Position> {
    BresenhamLine::new(from, corner).chain(BresenhamLine::new(corner, to).skip(1))
}

/// Cheap light check: is either L-shaped path between the points clear?
///
/// Tries horizontal-then-vertical and vertical-then-horizontal. Only tiles
/// strictly between the endpoints are tested, and off-grid tiles block.
pub fn light_reaches(grid: &TileGrid, from: Position, to: Position) -> bool {
    let clear = |corner: Position| {
        l_path(from, corner, to)
            .filter(|&pos| pos != from && pos != to)
            .all(|pos| !grid.blocks(pos))
    };
    clear(Position::new(to.x, from.y)) || clear(Position::new(from.x, to.y))
}

/// Loop extent and squared radius for a circle centred on the grid.
///
/// No tile lies further than `width + height` steps along either axis, so the
/// extent is capped there while the circle test keeps the full radius.
pub(crate) fn circle_extent(grid: &TileGrid, radius: i32) -> (i32, i64) {
    let radius = radius.max(0);
    let reach = radius.min((grid.width() + grid.height()) as i32);
    (reach, i64::from(radius).pow(2))
}

/// Recomputes what `viewer` can see within a circular `radius`.
///
/// Clears the visible bit everywhere (revealed tiles stay revealed) and
/// resets every light target, then reveal-casts to each tile in range.
/// Returns the number of visible tiles; an off-grid viewer sees none.
pub fn refresh_visibility(
    grid: &mut TileGrid,
    occupants: &Occupants,
    viewer: Position,
    radius: i32,
) -> usize {
    for tile in grid.tiles_mut() {
        tile.flags.remove(TileFlags::VISIBLE);
        tile.light_target = 0.0;
    }

    if !grid.in_bounds(viewer) {
        return 0;
    }
    let (reach, limit) = circle_extent(grid, radius);
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if i64::from(dx * dx + dy * dy) > limit {
                continue;
            }
            let target = viewer + Position::new(dx, dy);
            if grid.in_bounds(target) {
                cast_sight(grid, occupants, viewer, target, true);
            }
        }
    }

    grid.tiles().iter().filter(|tile| tile.is_visible()).count()
}
