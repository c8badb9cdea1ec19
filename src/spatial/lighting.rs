//! Light sources.

use super::sight::{circle_extent, light_reaches};
use crate::{Position, TileGrid};

/// Raises the light target of tiles around `source`.
///
/// Tiles within the circular `radius` that [`light_reaches`] from the source
/// get `strength` scaled down linearly with distance, never lowering a target
/// another source already raised. Returns the number of tiles lit.
pub fn illuminate(grid: &mut TileGrid, source: Position, radius: i32, strength: f32) -> usize {
    if radius < 0 || !grid.in_bounds(source) {
        return 0;
    }

    let falloff = radius as f32 + 1.0;
    let (reach, limit) = circle_extent(grid, radius);
    let mut lit = 0;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let squared = dx * dx + dy * dy;
            if i64::from(squared) > limit {
                continue;
            }
            let pos = source + Position::new(dx, dy);
            if !grid.in_bounds(pos) || !light_reaches(grid, source, pos) {
                continue;
            }

            let level = strength * (1.0 - (squared as f32).sqrt() / falloff);
            if let Some(tile) = grid.get_mut(pos) {
                tile.light_target = tile.light_target.max(level);
                lit += 1;
            }
        }
    }
    lit
}
