//! Spawn-point sampling and level population.
//!
//! The samplers return candidate tiles; [`populate`] uses them to put the
//! player start, the gold key and the monster spawn points on a fresh level.

use super::{doors, GenerationConfig, Level, Room};
use crate::spatial::DistanceField;
use crate::{ActorFlags, Occupants, Position, TileGrid, TileType, TileTypeMask};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Whether a door or locked door is among the 8 neighbours of `pos`.
fn beside_door(grid: &TileGrid, pos: Position) -> bool {
    pos.adjacent_positions()
        .iter()
        .any(|&neighbour| grid.tile_type(neighbour).is_some_and(TileType::is_door))
}

/// Tiles of room `room_index` that are free and not in a doorway.
///
/// A tile qualifies when no occupant stands on it and none of its 8 neighbours
/// is a door or locked door. An unknown room index gives an empty list.
pub fn sample_room_tiles(grid: &TileGrid, occupants: &Occupants, room_index: usize) -> Vec<Position> {
    grid.iter()
        .filter(|(pos, tile)| {
            tile.room == Some(room_index) && !occupants.is_occupied(*pos) && !beside_door(grid, *pos)
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// Every tile the distance field from `source` reaches.
///
/// `ignore_mask` lists blocking tile types to walk through anyway. Overwrites
/// the grid's distance values.
pub fn sample_reachable_tiles(
    grid: &mut TileGrid,
    source: Position,
    ignore_mask: TileTypeMask,
) -> Vec<Position> {
    let mut field = DistanceField::new();
    field.compute(grid, source, ignore_mask);
    reached_tiles(grid)
}

/// Tiles carrying a distance from the most recent distance-field run.
pub fn reached_tiles(grid: &TileGrid) -> Vec<Position> {
    grid.iter()
        .filter(|(_, tile)| tile.distance.is_some())
        .map(|(pos, _)| pos)
        .collect()
}

/// Places the start, the key and the monster spawn points.
///
/// The start goes in the first room, in generation order, from which some key
/// spot outside the start and exit rooms is reachable with locked doors shut.
/// The key goes in a room reachable from the start other than the start and
/// exit rooms, falling back to any other reachable floor and then to the start
/// room itself. A level left without a key has its locked doors opened again.
/// Monsters spawn in every room but the start room. Anything without a
/// candidate tile is skipped.
pub fn populate(level: &mut Level, config: &GenerationConfig, rng: &mut StdRng) {
    let mut occupants = Occupants::new();

    let start_room = choose_start_room(&mut level.grid, &level.rooms);
    level.start = start_room.and_then(|room| place_start(&mut level.grid, &occupants, room, rng));
    let (Some(start), Some(start_room)) = (level.start, start_room) else {
        warn!("no start tile available; level left unpopulated");
        return;
    };
    occupants.insert(start, ActorFlags::BLOCKS_MOVEMENT | ActorFlags::BLOCKS_SIGHT);

    // With a single room the player already starts beside the exit.
    if level.rooms.len() > 1 {
        let exit_room = level.rooms.len() - 1;
        let key = place_key(&mut level.grid, start_room, exit_room, &occupants, start, rng);
        match key {
            Some(key) => occupants.insert(key, ActorFlags::empty()),
            None => warn!("no reachable tile for the key"),
        }
        level.key = key;
    }
    if level.key.is_none() {
        let unlocked = doors::unlock_doors(&mut level.grid);
        if unlocked > 0 {
            debug!("no key on the level; unlocked {} doors", unlocked);
        }
    }

    level.monster_spawns.clear();
    for room in (0..level.rooms.len()).filter(|&room| room != start_room) {
        let mut spots = floor_only(&level.grid, sample_room_tiles(&level.grid, &occupants, room));
        spots.shuffle(rng);
        for &spot in spots.iter().take(config.monsters_per_room as usize) {
            occupants.insert(spot, ActorFlags::BLOCKS_MOVEMENT | ActorFlags::BLOCKS_SIGHT);
            level.monster_spawns.push(spot);
        }
    }
    debug!(
        "placed start {} in room {}, key {:?}, {} monster spawns",
        start,
        start_room,
        level.key,
        level.monster_spawns.len()
    );
}

fn floor_only(grid: &TileGrid, tiles: Vec<Position>) -> Vec<Position> {
    tiles
        .into_iter()
        .filter(|&pos| grid.tile_type(pos) == Some(TileType::Floor))
        .collect()
}

/// Floor outside both the start and the exit room.
fn is_key_spot(grid: &TileGrid, pos: Position, start_room: usize, exit_room: usize) -> bool {
    grid.get(pos).is_some_and(|tile| {
        tile.tile_type == TileType::Floor
            && tile.room != Some(start_room)
            && tile.room != Some(exit_room)
    })
}

/// The first room that can reach a key spot with locked doors shut.
///
/// A room sharing its only door with the exit room is sealed in by the lock.
/// Falls back to room 0 when every room is; the key then stays in the start
/// room. `None` only when there are no rooms.
fn choose_start_room(grid: &mut TileGrid, rooms: &[Room]) -> Option<usize> {
    match rooms.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }

    let exit_room = rooms.len() - 1;
    for room in &rooms[..exit_room] {
        let reachable = sample_reachable_tiles(grid, room.center(), TileTypeMask::empty());
        if reachable
            .iter()
            .any(|&pos| is_key_spot(grid, pos, room.index, exit_room))
        {
            return Some(room.index);
        }
        debug!("room {} is sealed in by the exit locks", room.index);
    }
    Some(0)
}

/// Marks a random free floor tile of `room` as the start.
fn place_start(
    grid: &mut TileGrid,
    occupants: &Occupants,
    room: usize,
    rng: &mut StdRng,
) -> Option<Position> {
    let mut candidates = floor_only(grid, sample_room_tiles(grid, occupants, room));
    if candidates.is_empty() {
        // Tiny rooms can be all doorway; any floor tile of the room will do.
        candidates = grid
            .iter()
            .filter(|(_, tile)| tile.room == Some(room) && tile.tile_type == TileType::Floor)
            .map(|(pos, _)| pos)
            .collect();
    }

    let start = *candidates.choose(rng)?;
    grid.set_type(start, TileType::Start);
    Some(start)
}

/// Picks the key tile: reachable from `start` without passing a locked door.
fn place_key(
    grid: &mut TileGrid,
    start_room: usize,
    exit_room: usize,
    occupants: &Occupants,
    start: Position,
    rng: &mut StdRng,
) -> Option<Position> {
    let reachable: HashSet<Position> = sample_reachable_tiles(grid, start, TileTypeMask::empty())
        .into_iter()
        .collect();
    debug!("{} tiles reachable from the start", reachable.len());

    let grid: &TileGrid = grid;
    let in_key_rooms: Vec<Position> = (0..exit_room)
        .filter(|&room| room != start_room)
        .flat_map(|room| sample_room_tiles(grid, occupants, room))
        .filter(|pos| reachable.contains(pos) && grid.tile_type(*pos) == Some(TileType::Floor))
        .collect();
    if let Some(&key) = in_key_rooms.choose(rng) {
        return Some(key);
    }

    // HashSet order is not seeded; sort before drawing.
    let mut elsewhere: Vec<Position> = reachable
        .iter()
        .copied()
        .filter(|&pos| is_key_spot(grid, pos, start_room, exit_room) && !occupants.is_occupied(pos))
        .collect();
    elsewhere.sort_unstable();
    if let Some(&key) = elsewhere.choose(rng) {
        return Some(key);
    }

    debug!("start room {} is sealed in; key stays inside it", start_room);
    let mut inside: Vec<Position> = reachable
        .iter()
        .copied()
        .filter(|&pos| {
            grid.get(pos).is_some_and(|tile| {
                tile.tile_type == TileType::Floor && tile.room == Some(start_room)
            }) && !occupants.is_occupied(pos)
        })
        .collect();
    inside.sort_unstable();
    inside.choose(rng).copied()
}
