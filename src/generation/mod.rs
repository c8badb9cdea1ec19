//! # Generation Module
//!
//! Procedural level generation: rooms, mazes, region merging, dead-end
//! pruning, doors and the locked exit, then start/key/monster placement.
//!
//! The stages run once, in order, against a fresh `TileGrid`:
//!
//! 1. [`rooms`] stamps non-overlapping odd-aligned rooms
//! 2. [`maze`] fills the remaining odd/odd wall cells with perfect mazes
//! 3. [`connect`] merges every region into one through random connectors
//! 4. [`prune`] retracts corridor dead ends until none remain
//! 5. [`doors`] turns surviving connectors into doors and locks the exit room
//! 6. [`placement`] picks the start, the key and monster spawn points
//!
//! [`validate`] checks the finished level before it is handed out.

pub mod connect;
pub mod doors;
pub mod dungeon;
pub mod maze;
pub mod placement;
pub mod prune;
pub mod rooms;
pub mod validate;

pub use dungeon::*;
pub use placement::{sample_reachable_tiles, sample_room_tiles};

use crate::config::{
    DEFAULT_HEIGHT, DEFAULT_ROOM_ATTEMPTS, DEFAULT_WIDTH, MAX_DIMENSION, MIN_DIMENSION,
};
use crate::{DelveError, DelveResult, Position, TileGrid};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for level generation.
///
/// Missing fields fall back to [`GenerationConfig::default`] when loading
/// from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Level width in tiles (odd)
    pub width: u32,
    /// Level height in tiles (odd)
    pub height: u32,
    /// Room placement attempts before giving up
    pub room_attempts: u32,
    /// Rooms are `2 * n + 1` tiles across for `n` in `1..=max_room_half_size`
    pub max_room_half_size: u32,
    /// Whether one side of a room may be stretched
    pub rectangular_rooms: bool,
    /// Monster spawn points per room, outside the start room
    pub monsters_per_room: u32,
}

impl GenerationConfig {
    /// Creates the default configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            room_attempts: DEFAULT_ROOM_ATTEMPTS,
            max_room_half_size: 3,
            rectangular_rooms: true,
            monsters_per_room: 2,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            width: 21,
            height: 15,
            room_attempts: 30,
            max_room_half_size: 2,
            monsters_per_room: 1,
            ..Self::new(seed)
        }
    }

    /// Returns the configuration resized to `width` x `height`.
    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    /// Checks the parameters a level build relies on.
    pub fn validate(&self) -> DelveResult<()> {
        if self.width % 2 == 0 || self.height % 2 == 0 {
            return Err(DelveError::InvalidConfig(format!(
                "level dimensions must be odd, got {}x{}",
                self.width, self.height
            )));
        }
        let range = MIN_DIMENSION..=MAX_DIMENSION;
        if !range.contains(&self.width) || !range.contains(&self.height) {
            return Err(DelveError::InvalidConfig(format!(
                "level dimensions must be within {}..={}, got {}x{}",
                MIN_DIMENSION, MAX_DIMENSION, self.width, self.height
            )));
        }
        // The widest room still fits inside a MAX_DIMENSION grid's border.
        let half_sizes = 1..=(MAX_DIMENSION - 3) / 2;
        if !half_sizes.contains(&self.max_room_half_size) {
            return Err(DelveError::InvalidConfig(format!(
                "max_room_half_size must be within {}..={}, got {}",
                half_sizes.start(),
                half_sizes.end(),
                self.max_room_half_size
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> DelveResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> DelveResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room, in floor tiles.
///
/// `index` is the generation order; it doubles as the room's region id and as
/// the membership tag on its tiles. Corners sit on odd coordinates and both
/// sides are odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Generation order
    pub index: usize,
    /// Top-left floor tile
    pub top_left: Position,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Room};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 3, 5);
    /// assert_eq!(room.bottom_right(), Position::new(7, 9));
    /// assert!(room.contains(Position::new(6, 6)));
    /// assert!(!room.contains(Position::new(8, 6)));
    /// ```
    pub fn new(index: usize, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            index,
            top_left,
            width,
            height,
        }
    }

    /// Gets the bottom-right floor tile.
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 - 1,
            self.top_left.y + self.height as i32 - 1,
        )
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }

    /// Gets the area of the room in tiles.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Checks if a position is inside this room.
    pub fn contains(&self, pos: Position) -> bool {
        self.contains_with_margin(pos, 0)
    }

    /// Checks if a position is inside the room grown by `margin` on every side.
    pub fn contains_with_margin(&self, pos: Position, margin: i32) -> bool {
        let bottom_right = self.bottom_right();
        pos.x >= self.top_left.x - margin
            && pos.y >= self.top_left.y - margin
            && pos.x <= bottom_right.x + margin
            && pos.y <= bottom_right.y + margin
    }

    /// Checks if this room's rectangle shares any tile with another's.
    pub fn intersects(&self, other: &Room) -> bool {
        let a = self.bottom_right();
        let b = other.bottom_right();
        self.top_left.x <= b.x
            && other.top_left.x <= a.x
            && self.top_left.y <= b.y
            && other.top_left.y <= a.y
    }

    /// The four corner tiles, clockwise from the top-left.
    pub fn corners(&self) -> [Position; 4] {
        let bottom_right = self.bottom_right();
        [
            self.top_left,
            Position::new(bottom_right.x, self.top_left.y),
            bottom_right,
            Position::new(self.top_left.x, bottom_right.y),
        ]
    }

    /// Every tile of the room, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let Room {
            top_left,
            width,
            height,
            ..
        } = *self;
        (0..height as i32).flat_map(move |dy| {
            (0..width as i32).map(move |dx| Position::new(top_left.x + dx, top_left.y + dy))
        })
    }
}

/// A finished level: the grid plus everything placed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Seed the level was built from
    pub seed: u64,
    /// The tiles
    pub grid: TileGrid,
    /// Placed rooms, in generation order
    pub rooms: Vec<Room>,
    /// Where the player arrives
    pub start: Option<Position>,
    /// The level exit, in a corner of the last room
    pub exit: Option<Position>,
    /// The gold key that opens the exit room
    pub key: Option<Position>,
    /// Monster spawn points
    pub monster_spawns: Vec<Position>,
}

impl Level {
    /// The room holding the exit.
    pub fn exit_room(&self) -> Option<&Room> {
        self.rooms.last()
    }

    /// The room the player starts in.
    pub fn start_room(&self) -> Option<&Room> {
        let start = self.start?;
        self.rooms.iter().find(|room| room.contains(start))
    }

    /// Compact, serializable description of the level.
    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            seed: self.seed,
            width: self.grid.width(),
            height: self.grid.height(),
            map: self.grid.to_string().lines().map(str::to_owned).collect(),
            rooms: self.rooms.clone(),
            start: self.start,
            exit: self.exit,
            key: self.key,
            monster_spawns: self.monster_spawns.clone(),
        }
    }
}

/// JSON-friendly snapshot of a level, with the map as ASCII rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub map: Vec<String>,
    pub rooms: Vec<Room>,
    pub start: Option<Position>,
    pub exit: Option<Position>,
    pub key: Option<Position>,
    pub monster_spawns: Vec<Position>,
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Builds a level of the given size from a seed.
///
/// # Panics
///
/// Panics with a diagnostic when the dimensions are even or out of range, or
/// when the finished level fails verification. Use
/// [`LevelGenerator::try_generate`] to get these as errors instead.
pub fn generate(width: u32, height: u32, seed: u64) -> Level {
    let config = GenerationConfig::new(seed).with_size(width, height);
    match LevelGenerator::new().try_generate(&config) {
        Ok(level) => level,
        Err(err) => panic!("level generation failed: {}", err),
    }
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}
