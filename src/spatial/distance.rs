//! Breadth-first distance fields.
//!
//! Distances are written into [`Tile::distance`](crate::Tile) so monsters can
//! roll downhill towards the source and samplers can list reachable tiles.

use crate::{Direction, Position, TileGrid, TileTypeMask};
use log::trace;
use std::collections::VecDeque;

/// Reusable BFS queue for distance-field runs.
#[derive(Debug, Clone, Default)]
pub struct DistanceField {
    queue: VecDeque<Position>,
}

impl DistanceField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills every tile's distance with the hop count from `source`.
    ///
    /// Every tile is reset to `None` first. Steps go to all 8 neighbours, and
    /// a diagonal step does not look at the two cardinal cells it passes, so
    /// distances can flow around wall corners. Tiles whose type is in
    /// `ignore` count as traversable even when they block movement.
    ///
    /// Returns the number of tiles reached, the source included. An off-grid
    /// source reaches nothing.
    pub fn compute(&mut self, grid: &mut TileGrid, source: Position, ignore: TileTypeMask) -> usize {
        for tile in grid.tiles_mut() {
            tile.distance = None;
        }
        let Some(tile) = grid.get_mut(source) else {
            return 0;
        };
        tile.distance = Some(0);

        // Grows to the grid area once, then stays.
        self.queue.clear();
        self.queue.reserve(grid.area());
        self.queue.push_back(source);

        let mut reached = 1;
        while let Some(current) = self.queue.pop_front() {
            let next = grid
                .get(current)
                .and_then(|tile| tile.distance)
                .map_or(0, |distance| distance + 1);

            for direction in Direction::ALL {
                let neighbour = current.step(direction);
                let Some(tile) = grid.get_mut(neighbour) else {
                    continue;
                };
                if tile.distance.is_some() || !tile.is_traversable(ignore) {
                    continue;
                }
                tile.distance = Some(next);
                self.queue.push_back(neighbour);
                reached += 1;
            }
        }

        trace!("distance field from {} reached {} tiles", source, reached);
        reached
    }
}

/// One-shot [`DistanceField::compute`] with a fresh queue.
pub fn compute_distance_field(grid: &mut TileGrid, source: Position, ignore: TileTypeMask) -> usize {
    DistanceField::new().compute(grid, source, ignore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileType;

    fn distance(grid: &TileGrid, x: i32, y: i32) -> Option<u32> {
        grid.get(Position::new(x, y)).and_then(|tile| tile.distance)
    }

    #[test]
    fn test_open_room_uses_chebyshev_steps() {
        let mut grid = TileGrid::new(9, 9);
        for y in 1..=7 {
            for x in 1..=7 {
                grid.carve(Position::new(x, y), 0);
            }
        }
        let reached = compute_distance_field(&mut grid, Position::new(1, 1), TileTypeMask::empty());
        assert_eq!(reached, 49);
        assert_eq!(distance(&grid, 1, 1), Some(0));
        assert_eq!(distance(&grid, 7, 7), Some(6));
        assert_eq!(distance(&grid, 7, 2), Some(6));
        assert_eq!(distance(&grid, 0, 0), None);
    }

    #[test]
    fn test_diagonal_cuts_wall_corner() {
        // (1, 1) and (2, 2) touch only diagonally, between two walls.
        let mut grid = TileGrid::new(5, 5);
        grid.carve(Position::new(1, 1), 0);
        grid.carve(Position::new(2, 2), 0);
        compute_distance_field(&mut grid, Position::new(1, 1), TileTypeMask::empty());
        assert_eq!(distance(&grid, 2, 2), Some(1));
    }

    #[test]
    fn test_ignore_mask_opens_locked_doors() {
        let mut grid = TileGrid::new(7, 3);
        for x in 1..=5 {
            grid.carve(Position::new(x, 1), 0);
        }
        grid.set_type(Position::new(3, 1), TileType::LockedDoor);

        let mut field = DistanceField::new();
        assert_eq!(field.compute(&mut grid, Position::new(1, 1), TileTypeMask::empty()), 2);
        assert_eq!(distance(&grid, 5, 1), None);

        assert_eq!(field.compute(&mut grid, Position::new(1, 1), TileTypeMask::LOCKED_DOOR), 5);
        assert_eq!(distance(&grid, 5, 1), Some(4));
    }

    #[test]
    fn test_stale_distances_are_cleared() {
        let mut grid = TileGrid::new(7, 3);
        for x in 1..=5 {
            grid.carve(Position::new(x, 1), 0);
        }
        let mut field = DistanceField::new();
        field.compute(&mut grid, Position::new(1, 1), TileTypeMask::empty());
        grid.fill(Position::new(3, 1));
        field.compute(&mut grid, Position::new(1, 1), TileTypeMask::empty());
        assert_eq!(distance(&grid, 5, 1), None);
        assert_eq!(distance(&grid, 3, 1), None);
    }

    #[test]
    fn test_off_grid_source_reaches_nothing() {
        let mut grid = TileGrid::new(5, 5);
        grid.carve(Position::new(2, 2), 0);
        assert_eq!(compute_distance_field(&mut grid, Position::new(-1, 2), TileTypeMask::empty()), 0);
        assert!(grid.tiles().iter().all(|tile| tile.distance.is_none()));
    }
}
