//! Room placement by rejection sampling.

use super::{GenerationConfig, Room};
use crate::{Position, TileGrid};
use rand::rngs::StdRng;
use rand::Rng;

/// Scatters rooms over an all-wall grid.
///
/// Each attempt draws an odd-sized room, stretches one side by an even amount
/// when `rectangular_rooms` is set, aligns it to odd coordinates and throws it
/// away if it overlaps a room already placed. Room `i` is carved as region `i`.
/// Running out of attempts with few rooms placed is a normal outcome.
pub fn place_rooms(grid: &mut TileGrid, config: &GenerationConfig, rng: &mut StdRng) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();
    let grid_width = grid.width() as i32;
    let grid_height = grid.height() as i32;

    for _ in 0..config.room_attempts {
        let size = rng.gen_range(1..=config.max_room_half_size as i32) * 2 + 1;
        let mut width = size;
        let mut height = size;
        if config.rectangular_rooms {
            let rectangularity = rng.gen_range(0..=1 + size / 2) * 2;
            if rng.gen_bool(0.5) {
                width += rectangularity;
            } else {
                height += rectangularity;
            }
        }

        // Leave the edge ring untouched.
        if width > grid_width - 2 || height > grid_height - 2 {
            continue;
        }

        let x = rng.gen_range(0..(grid_width - width) / 2) * 2 + 1;
        let y = rng.gen_range(0..(grid_height - height) / 2) * 2 + 1;
        let room = Room::new(rooms.len(), Position::new(x, y), width as u32, height as u32);

        if rooms.iter().any(|other| other.intersects(&room)) {
            continue;
        }

        stamp_room(grid, &room);
        rooms.push(room);
    }

    rooms
}

/// Carves a room to floor and tags its tiles with the room index.
pub fn stamp_room(grid: &mut TileGrid, room: &Room) {
    for pos in room.positions() {
        grid.carve(pos, room.index as u32);
        if let Some(tile) = grid.get_mut(pos) {
            tile.room = Some(room.index);
        }
    }
}
