//! Properties every generated level must have, checked from the outside.

use delve::{
    compute_distance_field, generate, GenerationConfig, Level, LevelGenerator, Position, TileGrid,
    TileType, TileTypeMask,
};
use pathfinding::prelude::bfs_reach;
use proptest::prelude::*;

/// Open tiles reachable from `start` by cardinal steps, locked doors passable.
fn reachable(grid: &TileGrid, start: Position) -> usize {
    bfs_reach(start, |&pos: &Position| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&next| grid.is_open(next))
            .collect::<Vec<_>>()
    })
    .count()
}

fn open_tiles(grid: &TileGrid) -> Vec<Position> {
    grid.positions().filter(|&pos| grid.is_open(pos)).collect()
}

fn build(seed: u64, width: u32, height: u32) -> Level {
    let mut generator = LevelGenerator::new();
    // Checked independently below.
    generator.verify = false;
    generator
        .try_generate(&GenerationConfig::new(seed).with_size(width, height))
        .expect("valid config")
}

fn assert_level_properties(level: &Level) {
    let grid = &level.grid;

    let open = open_tiles(grid);
    if let Some(&first) = open.first() {
        assert_eq!(reachable(grid, first), open.len(), "walkable tiles are split");
    }

    for (i, a) in level.rooms.iter().enumerate() {
        for b in &level.rooms[i + 1..] {
            assert!(!a.intersects(b), "rooms {:?} and {:?} overlap", a, b);
        }
    }

    for pos in grid.positions() {
        if grid.tile_type(pos) != Some(TileType::Floor) {
            continue;
        }
        let exits = pos
            .cardinal_adjacent_positions()
            .iter()
            .filter(|&&next| grid.is_open(next))
            .count();
        assert_ne!(exits, 1, "dead end left at {}", pos);
    }

    for x in 0..grid.width() as i32 {
        for y in [0, grid.height() as i32 - 1] {
            assert_eq!(grid.tile_type(Position::new(x, y)), Some(TileType::Wall));
        }
    }
    assert!(grid.count_type(TileType::Exit) <= 1);
}

/// A level with locked doors has a key the player can walk to first.
fn assert_winnable(level: &Level) {
    if level.grid.count_type(TileType::LockedDoor) == 0 {
        return;
    }
    let start = level.start.expect("start placed");
    let key = level.key.expect("locked doors without a key");

    let mut grid = level.grid.clone();
    compute_distance_field(&mut grid, start, TileTypeMask::empty());
    assert!(grid.get(key).and_then(|tile| tile.distance).is_some(), "key {} out of reach", key);

    if let Some(exit) = level.exit {
        compute_distance_field(&mut grid, start, TileTypeMask::LOCKED_DOOR);
        assert!(grid.get(exit).and_then(|tile| tile.distance).is_some(), "exit {} out of reach", exit);
    }
}

fn odd(range: std::ops::RangeInclusive<u32>) -> impl Strategy<Value = u32> {
    range.prop_map(|half| half * 2 + 1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn generated_levels_hold_their_invariants(seed in any::<u64>(), width in odd(2..=30), height in odd(2..=30)) {
        let level = build(seed, width, height);
        assert_level_properties(&level);
        assert_winnable(&level);
        prop_assert_eq!(level.grid.width(), width);
        prop_assert_eq!(level.grid.height(), height);
    }

    #[test]
    fn same_seed_same_level(seed in any::<u64>()) {
        let first = build(seed, 25, 21);
        let second = build(seed, 25, 21);
        prop_assert_eq!(first.grid.to_string(), second.grid.to_string());
        prop_assert_eq!(first.rooms, second.rooms);
        prop_assert_eq!(first.start, second.start);
        prop_assert_eq!(first.key, second.key);
        prop_assert_eq!(first.monster_spawns, second.monster_spawns);
    }
}

#[test]
fn test_standard_level_scenario() {
    for seed in [1, 7, 42, 1234, 98765] {
        let mut level = generate(31, 31, seed);
        assert_level_properties(&level);
        assert!(!level.rooms.is_empty(), "seed {}", seed);
        assert_eq!(level.grid.count_type(TileType::Exit), 1, "seed {}", seed);

        let again = generate(31, 31, seed);
        assert_eq!(level.grid.to_string(), again.grid.to_string());

        if level.rooms.len() < 2 {
            continue;
        }
        let start = level.start.expect("start placed");
        let exit = level.exit.expect("exit placed");
        let exit_room = *level.exit_room().expect("exit room");
        assert!(exit_room.contains(exit));

        // With the locks shut the exit is out of reach.
        compute_distance_field(&mut level.grid, start, TileTypeMask::empty());
        assert_eq!(level.grid.get(exit).and_then(|tile| tile.distance), None, "seed {}", seed);
        let key = level.key.expect("key placed");
        assert!(level.grid.get(key).and_then(|tile| tile.distance).is_some());
        assert!(!exit_room.contains(key));

        // The key opens them.
        compute_distance_field(&mut level.grid, start, TileTypeMask::LOCKED_DOOR);
        assert!(level.grid.get(exit).and_then(|tile| tile.distance).is_some());
        assert!(level.grid.count_type(TileType::LockedDoor) > 0);
    }
}

#[test]
fn test_locked_levels_are_winnable() {
    // Seeds 10, 66, 97, 100 and 125 put the first room behind the exit locks.
    for seed in 0..300 {
        let level = generate(31, 31, seed);
        assert_winnable(&level);
        if level.grid.count_type(TileType::LockedDoor) > 0 {
            let start_room = level.start_room().expect("start room");
            assert!(!level.exit_room().is_some_and(|room| room == start_room), "seed {}", seed);
        }
    }
}

#[test]
fn test_spawns_sit_in_rooms() {
    let level = generate(41, 31, 5);
    let start_room = level.start_room().expect("start room");
    for spawn in &level.monster_spawns {
        assert!(!start_room.contains(*spawn));
        assert!(level.rooms.iter().any(|room| room.contains(*spawn)));
        assert_eq!(level.grid.tile_type(*spawn), Some(TileType::Floor));
    }
    let start = level.start.expect("start placed");
    assert!(start_room.contains(start));
    assert!(!level.monster_spawns.contains(&start));
}
