//! Recursive-backtracking maze carving.
//!
//! Corridors live on odd/odd anchor cells; the even cells between two anchors
//! are carved when the maze steps from one to the other. Every tree grown here
//! is a perfect maze with its own region id.

use crate::{Direction, Position, Region, TileGrid, TileType};
use rand::rngs::StdRng;
use rand::Rng;

/// Grows a maze from every odd/odd cell that is still wall.
///
/// Region ids are handed out from `first_region` upwards, one per tree.
/// Returns the next unused region id.
pub fn carve_mazes(grid: &mut TileGrid, first_region: u32, rng: &mut StdRng) -> u32 {
    let mut next_region = first_region;
    let mut stack = Vec::new();

    for y in (1..grid.height() as i32).step_by(2) {
        for x in (1..grid.width() as i32).step_by(2) {
            let pos = Position::new(x, y);
            if !is_uncarved(grid, pos) {
                continue;
            }
            grow_maze(grid, pos, next_region, &mut stack, rng);
            next_region += 1;
        }
    }

    next_region
}

/// Carves one perfect maze tree starting at `start`.
///
/// Depth-first with an explicit stack: from the cell on top, pick a random
/// cardinal neighbour two steps away that is still uncarved, open the cell in
/// between and push the neighbour; pop when no neighbour is left.
pub fn grow_maze(
    grid: &mut TileGrid,
    start: Position,
    region: u32,
    stack: &mut Vec<Position>,
    rng: &mut StdRng,
) {
    stack.clear();
    grid.carve(start, region);
    stack.push(start);

    let mut unmade = Vec::with_capacity(Direction::CARDINAL.len());
    while let Some(&cell) = stack.last() {
        unmade.clear();
        for dir in Direction::CARDINAL {
            if is_uncarved(grid, cell + dir.to_delta() * 2) {
                unmade.push(dir);
            }
        }

        if unmade.is_empty() {
            stack.pop();
            continue;
        }

        let dir = unmade[rng.gen_range(0..unmade.len())];
        let next = cell + dir.to_delta() * 2;
        grid.carve(cell.step(dir), region);
        grid.carve(next, region);
        stack.push(next);
    }
}

/// In bounds, off the edge ring, and still plain wall.
fn is_uncarved(grid: &TileGrid, pos: Position) -> bool {
    grid.region(pos) == Region::Unassigned && grid.tile_type(pos) == Some(TileType::Wall)
}
