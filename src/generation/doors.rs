//! Doors, the level exit, and the locks guarding it.

use super::Room;
use crate::{Direction, Position, TileGrid, TileType};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Floor with open tiles on both sides along one axis.
///
/// Rejects dead-end nubs and corners: a door only ever sits in a straight
/// stretch of passage.
pub fn is_door_spot(grid: &TileGrid, pos: Position) -> bool {
    let open = |dir: Direction| grid.is_open(pos.step(dir));
    grid.tile_type(pos) == Some(TileType::Floor)
        && ((open(Direction::North) && open(Direction::South))
            || (open(Direction::West) && open(Direction::East)))
}

/// Turns every still-valid connector into a door. Returns the door count.
pub fn place_doors(grid: &mut TileGrid, candidates: &[Position]) -> usize {
    let mut placed = 0;
    for &pos in candidates {
        if is_door_spot(grid, pos) {
            grid.set_type(pos, TileType::Door);
            placed += 1;
        }
    }
    placed
}

/// Whether any cardinal neighbour of `pos` is a door.
fn next_to_door(grid: &TileGrid, pos: Position) -> bool {
    pos.cardinal_adjacent_positions()
        .iter()
        .any(|&neighbour| grid.tile_type(neighbour).is_some_and(TileType::is_door))
}

/// Puts the exit in the last room and locks the doors around that room.
///
/// The exit goes in a random corner that has no door beside it, or in the room
/// centre when every corner does. Every door within one tile of the room is
/// then upgraded to a locked door. Returns `None` when no room was placed.
pub fn place_exit(grid: &mut TileGrid, rooms: &[Room], rng: &mut StdRng) -> Option<Position> {
    let Some(room) = rooms.last() else {
        warn!("no rooms placed; level has no exit");
        return None;
    };

    let mut corners = room.corners();
    corners.shuffle(rng);
    let exit = corners
        .into_iter()
        .find(|&corner| !next_to_door(grid, corner))
        .unwrap_or_else(|| room.center());
    grid.set_type(exit, TileType::Exit);

    let locked = lock_doors_around(grid, room);
    debug!(
        "exit at {} in room {}, {} doors locked",
        exit, room.index, locked
    );
    Some(exit)
}

/// Upgrades every door inside the room grown by one tile. Returns the count.
pub fn lock_doors_around(grid: &mut TileGrid, room: &Room) -> usize {
    let grown = Room::new(
        room.index,
        room.top_left - Position::new(1, 1),
        room.width + 2,
        room.height + 2,
    );

    let mut locked = 0;
    for pos in grown.positions() {
        if grid.tile_type(pos) == Some(TileType::Door) {
            grid.set_type(pos, TileType::LockedDoor);
            locked += 1;
        }
    }
    locked
}

/// Turns every locked door back into a plain door. Returns the count.
pub fn unlock_doors(grid: &mut TileGrid) -> usize {
    let locked = grid.positions_of_type(TileType::LockedDoor);
    for &pos in &locked {
        grid.set_type(pos, TileType::Door);
    }
    locked.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;
    use crate::GenerationConfig;

    /// Two 3x3 rooms joined through a corridor at row 2.
    fn two_rooms() -> (TileGrid, Vec<Room>) {
        let mut grid = TileGrid::new(13, 5);
        let rooms = vec![
            Room::new(0, Position::new(1, 1), 3, 3),
            Room::new(1, Position::new(9, 1), 3, 3),
        ];
        for room in &rooms {
            crate::generation::rooms::stamp_room(&mut grid, room);
        }
        for x in 4..=8 {
            grid.carve(Position::new(x, 2), 2);
        }
        (grid, rooms)
    }

    #[test]
    fn test_door_spot_requires_straight_passage() {
        let (grid, _) = two_rooms();
        assert!(is_door_spot(&grid, Position::new(4, 2)));
        assert!(is_door_spot(&grid, Position::new(8, 2)));
        // Room corner: open to the east and south only.
        assert!(!is_door_spot(&grid, Position::new(1, 1)));
        // Wall is never a door spot.
        assert!(!is_door_spot(&grid, Position::new(4, 1)));
    }

    #[test]
    fn test_invalidated_candidates_are_skipped() {
        let (mut grid, _) = two_rooms();
        grid.fill(Position::new(6, 2));
        let placed = place_doors(
            &mut grid,
            &[Position::new(4, 2), Position::new(5, 2), Position::new(6, 2)],
        );
        // (4, 2) is still a through tile; (5, 2) became a nub; (6, 2) is wall.
        assert_eq!(placed, 1);
        assert_eq!(grid.tile_type(Position::new(4, 2)), Some(TileType::Door));
        assert_eq!(grid.tile_type(Position::new(5, 2)), Some(TileType::Floor));
    }

    #[test]
    fn test_exit_avoids_door_corners_and_locks_doors() {
        let (mut grid, rooms) = two_rooms();
        place_doors(&mut grid, &[Position::new(4, 2), Position::new(8, 2)]);

        let config = GenerationConfig::new(4);
        let mut rng = create_rng(&config);
        let exit = place_exit(&mut grid, &rooms, &mut rng).unwrap();

        assert!(rooms[1].corners().contains(&exit));
        assert_eq!(grid.tile_type(exit), Some(TileType::Exit));
        assert_eq!(grid.tile_type(Position::new(8, 2)), Some(TileType::LockedDoor));
        // The door by the first room is out of reach of the lock.
        assert_eq!(grid.tile_type(Position::new(4, 2)), Some(TileType::Door));
        assert_eq!(grid.count_type(TileType::Exit), 1);
    }

    #[test]
    fn test_exit_falls_back_to_center() {
        let mut grid = TileGrid::new(7, 7);
        let room = Room::new(0, Position::new(2, 2), 3, 3);
        crate::generation::rooms::stamp_room(&mut grid, &room);
        for corner in room.corners() {
            // Put a door beside every corner.
            grid.set_type(corner - Position::new(0, 1), TileType::Door);
        }
        let config = GenerationConfig::new(4);
        let mut rng = create_rng(&config);

        let exit = place_exit(&mut grid, &[room], &mut rng).unwrap();
        assert_eq!(exit, room.center());
    }

    #[test]
    fn test_unlock_restores_plain_doors() {
        let (mut grid, rooms) = two_rooms();
        place_doors(&mut grid, &[Position::new(4, 2), Position::new(8, 2)]);
        assert_eq!(lock_doors_around(&mut grid, &rooms[1]), 1);

        assert_eq!(unlock_doors(&mut grid), 1);
        assert_eq!(grid.count_type(TileType::LockedDoor), 0);
        assert_eq!(grid.count_type(TileType::Door), 2);
        assert!(!grid.blocks(Position::new(8, 2)));
        assert_eq!(unlock_doors(&mut grid), 0);
    }

    #[test]
    fn test_no_rooms_no_exit() {
        let mut grid = TileGrid::new(7, 7);
        let config = GenerationConfig::new(4);
        let mut rng = create_rng(&config);
        assert!(place_exit(&mut grid, &[], &mut rng).is_none());
        assert_eq!(grid.count_type(TileType::Exit), 0);
    }
}
