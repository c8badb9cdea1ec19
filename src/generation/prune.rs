//! Dead-end removal.

use crate::{Position, TileGrid, TileType};

/// A floor tile with exactly one open cardinal neighbour.
pub fn is_dead_end(grid: &TileGrid, pos: Position) -> bool {
    grid.tile_type(pos) == Some(TileType::Floor)
        && pos
            .cardinal_adjacent_positions()
            .iter()
            .filter(|&&neighbour| grid.is_open(neighbour))
            .count()
            == 1
}

/// Fills dead ends back in until none are left.
///
/// Each pass collects every dead end first and fills them together, so a
/// two-tile stub disappears in one pass. Returns how many tiles were filled.
/// Connectors recorded earlier may be among them.
pub fn remove_dead_ends(grid: &mut TileGrid) -> usize {
    let mut removed = 0;
    let mut dead_ends = Vec::new();

    loop {
        dead_ends.clear();
        let view: &TileGrid = grid;
        dead_ends.extend(view.positions().filter(|&pos| is_dead_end(view, pos)));
        if dead_ends.is_empty() {
            break;
        }

        for &pos in &dead_ends {
            grid.fill(pos);
        }
        removed += dead_ends.len();
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Region;

    #[test]
    fn test_corridor_stub_is_retracted() {
        // Room with a three-tile stub sticking out to the east.
        let mut grid = TileGrid::new(11, 7);
        for y in 1..=3 {
            for x in 1..=3 {
                grid.carve(Position::new(x, y), 0);
            }
        }
        for x in 4..=6 {
            grid.carve(Position::new(x, 2), 0);
        }

        let removed = remove_dead_ends(&mut grid);
        assert_eq!(removed, 3);
        for x in 4..=6 {
            let pos = Position::new(x, 2);
            assert_eq!(grid.tile_type(pos), Some(TileType::Wall));
            assert_eq!(grid.region(pos), Region::Unassigned);
        }
        assert_eq!(grid.count_type(TileType::Floor), 9);
    }

    #[test]
    fn test_loop_survives() {
        // A ring of corridor has no dead ends.
        let mut grid = TileGrid::new(7, 7);
        for i in 1..=5 {
            grid.carve(Position::new(i, 1), 0);
            grid.carve(Position::new(i, 5), 0);
            grid.carve(Position::new(1, i), 0);
            grid.carve(Position::new(5, i), 0);
        }
        let floors = grid.count_type(TileType::Floor);
        assert_eq!(remove_dead_ends(&mut grid), 0);
        assert_eq!(grid.count_type(TileType::Floor), floors);
    }

    #[test]
    fn test_doors_are_never_pruned() {
        let mut grid = TileGrid::new(7, 5);
        grid.carve(Position::new(1, 1), 0);
        grid.carve(Position::new(2, 1), 0);
        grid.set_type(Position::new(1, 1), TileType::Door);

        // (2, 1) is a dead end, the door next to it is not a candidate.
        assert!(is_dead_end(&grid, Position::new(2, 1)));
        assert!(!is_dead_end(&grid, Position::new(1, 1)));
        remove_dead_ends(&mut grid);
        assert_eq!(grid.tile_type(Position::new(1, 1)), Some(TileType::Door));
    }
}
