//! # Occupants
//!
//! Spatial index of actors standing on the grid. Sight, pathfinding and the
//! placement sampler only need to know whether a tile is taken and whether its
//! occupant blocks sight or movement; everything else about actors lives with
//! the game.

use super::Position;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

bitflags! {
    /// How an actor interacts with the spatial queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ActorFlags: u8 {
        /// Line-of-sight casts stop at this actor
        const BLOCKS_SIGHT = 1 << 0;
        /// Pathfinding routes around this actor
        const BLOCKS_MOVEMENT = 1 << 1;
    }
}

/// Position -> actor flags for every occupied tile.
///
/// Several actors may share a tile; their flags are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupants {
    index: HashMap<Position, ActorFlags>,
}

impl Occupants {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an actor at `pos`.
    pub fn insert(&mut self, pos: Position, flags: ActorFlags) {
        *self.index.entry(pos).or_insert(ActorFlags::empty()) |= flags;
    }

    /// Clears `pos`, returning the flags that were there.
    pub fn remove(&mut self, pos: Position) -> Option<ActorFlags> {
        self.index.remove(&pos)
    }

    /// Moves whatever stands on `from` to `to`.
    pub fn relocate(&mut self, from: Position, to: Position) {
        if let Some(flags) = self.remove(from) {
            self.insert(to, flags);
        }
    }

    pub fn flags_at(&self, pos: Position) -> Option<ActorFlags> {
        self.index.get(&pos).copied()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.index.contains_key(&pos)
    }

    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.flags_at(pos)
            .is_some_and(|flags| flags.contains(ActorFlags::BLOCKS_SIGHT))
    }

    pub fn blocks_movement(&self, pos: Position) -> bool {
        self.flags_at(pos)
            .is_some_and(|flags| flags.contains(ActorFlags::BLOCKS_MOVEMENT))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
