//! Post-generation verification.
//!
//! These checks re-derive the generator's guarantees independently of the
//! code that is supposed to establish them.

use super::{prune, Level, Room};
use crate::{DelveError, DelveResult, Position, TileGrid, TileType};
use ::pathfinding::prelude::bfs_reach;

/// After region merging there must be exactly one carved region (or none).
pub fn check_regions_unified(grid: &TileGrid) -> DelveResult<()> {
    let ids = grid.region_ids();
    if ids.len() > 1 {
        return Err(DelveError::GenerationFailed(format!(
            "{} regions left after merging: {:?}",
            ids.len(),
            ids
        )));
    }
    Ok(())
}

/// Open tiles reachable from `start` by cardinal steps, locked doors included.
pub fn reachable_open_tiles(grid: &TileGrid, start: Position) -> usize {
    bfs_reach(start, |&pos: &Position| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&neighbour| grid.is_open(neighbour))
            .collect::<Vec<_>>()
    })
    .count()
}

/// Every open tile must be reachable from every other.
pub fn check_connectivity(grid: &TileGrid) -> DelveResult<()> {
    let open: Vec<Position> = grid.positions().filter(|&pos| grid.is_open(pos)).collect();
    let Some(&first) = open.first() else {
        return Ok(());
    };

    let reached = reachable_open_tiles(grid, first);
    if reached != open.len() {
        return Err(DelveError::GenerationFailed(format!(
            "only {} of {} open tiles reachable from {}",
            reached,
            open.len(),
            first
        )));
    }
    Ok(())
}

/// No two rooms may share a tile.
pub fn check_rooms_disjoint(rooms: &[Room]) -> DelveResult<()> {
    for (i, a) in rooms.iter().enumerate() {
        if let Some(b) = rooms[i + 1..].iter().find(|b| a.intersects(b)) {
            return Err(DelveError::GenerationFailed(format!(
                "room {} overlaps room {}",
                a.index, b.index
            )));
        }
    }
    Ok(())
}

/// No plain floor tile may be a dead end.
pub fn check_no_dead_ends(grid: &TileGrid) -> DelveResult<()> {
    if let Some(pos) = grid.positions().find(|&pos| prune::is_dead_end(grid, pos)) {
        return Err(DelveError::GenerationFailed(format!(
            "dead end left at {}",
            pos
        )));
    }
    Ok(())
}

/// Runs every check a finished level must pass.
pub fn validate_level(level: &Level) -> DelveResult<()> {
    let grid = &level.grid;
    check_rooms_disjoint(&level.rooms)?;
    check_connectivity(grid)?;
    check_no_dead_ends(grid)?;

    let exits = grid.count_type(TileType::Exit);
    if exits > 1 {
        return Err(DelveError::GenerationFailed(format!(
            "{} exit tiles",
            exits
        )));
    }
    let locked = grid.count_type(TileType::LockedDoor);
    if locked > 0 && level.key.is_none() {
        return Err(DelveError::GenerationFailed(format!(
            "{} locked doors but no key",
            locked
        )));
    }
    // Without rooms a pure maze may legitimately prune away to nothing.
    if !level.rooms.is_empty() && grid.count_type(TileType::Floor) == 0 {
        return Err(DelveError::GenerationFailed(
            "Level has no floor tiles".to_string(),
        ));
    }
    Ok(())
}
