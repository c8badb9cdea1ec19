//! Region merging.
//!
//! Starting from one random region, repeatedly open a wall that touches the
//! main region and exactly one other region, then fold that region into the
//! main one. The opened walls form a random spanning tree over the region
//! adjacency graph, and each one is a door candidate.

use crate::{Position, TileGrid, TileType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// A wall that would join the main region to `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    pub position: Position,
    pub other: u32,
}

/// Merges every carved region into one, returning the opened connectors.
///
/// Returns an empty list when there is at most one region.
pub fn connect_regions(grid: &mut TileGrid, rng: &mut StdRng) -> Vec<Position> {
    let Some(&main) = grid.region_ids().choose(rng) else {
        return Vec::new();
    };

    let mut opened = Vec::new();
    let mut connectors = Vec::new();
    loop {
        find_connectors(grid, main, &mut connectors);
        if connectors.is_empty() {
            break;
        }

        let connector = connectors[rng.gen_range(0..connectors.len())];
        grid.carve(connector.position, main);
        grid.relabel_region(connector.other, main);
        opened.push(connector.position);
    }

    opened
}

/// Collects every connector of the `main` region into `out`.
pub fn find_connectors(grid: &TileGrid, main: u32, out: &mut Vec<Connector>) {
    out.clear();
    for pos in grid.positions() {
        if grid.is_edge(pos) || grid.tile_type(pos) != Some(TileType::Wall) {
            continue;
        }
        if let Some(other) = connector_target(grid, pos, main) {
            out.push(Connector {
                position: pos,
                other,
            });
        }
    }
}

/// The single other region `pos` joins to `main`, if it is a connector.
fn connector_target(grid: &TileGrid, pos: Position, main: u32) -> Option<u32> {
    let mut touches_main = false;
    let mut other: Option<u32> = None;

    for neighbour in pos.cardinal_adjacent_positions() {
        match grid.region(neighbour).id() {
            Some(id) if id == main => touches_main = true,
            Some(id) => match other {
                None => other = Some(id),
                Some(seen) if seen != id => return None,
                Some(_) => {}
            },
            None => {}
        }
    }

    if touches_main {
        other
    } else {
        None
    }
}
