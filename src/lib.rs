//! # Delve
//!
//! Procedural dungeon levels on an odd-sized tile grid, plus the spatial queries
//! a turn-based game runs against them every turn.
//!
//! ## Architecture Overview
//!
//! - **Grid**: the tile array, the parallel region array used while generating,
//!   positions, directions and the actor occupancy index
//! - **Generation**: rooms, mazes, region merging, dead-end pruning, doors, the
//!   exit and the locked doors guarding it, then start/key/monster placement
//! - **Spatial**: breadth-first distance fields, Bresenham line of sight and the
//!   cheap light-reach check
//! - **Utils**: A* pathfinding and the integer line helpers
//!
//! Everything is single threaded. Queries that need scratch memory come in two
//! forms: a free function that allocates per call, and a reusable value
//! (`DistanceField`, `Pathfinder`) that keeps its buffers between calls.
//!
//! ```
//! use delve::{generate, Position};
//!
//! let level = generate(31, 31, 7);
//! assert!(level.exit.is_some());
//! assert!(level.grid.get(Position::new(0, 0)).is_some());
//! ```

pub mod generation;
pub mod grid;
pub mod spatial;
pub mod utils;

pub use generation::*;
pub use grid::*;
pub use spatial::*;
pub use utils::*;

/// Core error type for the Delve level engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A finished level broke one of its invariants
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Level and query constants.
pub mod config {
    /// Smallest grid side that can still hold a room
    pub const MIN_DIMENSION: u32 = 5;

    /// Largest supported grid side
    pub const MAX_DIMENSION: u32 = 255;

    /// Default level width in tiles
    pub const DEFAULT_WIDTH: u32 = 31;

    /// Default level height in tiles
    pub const DEFAULT_HEIGHT: u32 = 31;

    /// Room placement attempts per level
    pub const DEFAULT_ROOM_ATTEMPTS: u32 = 50;

    /// Coordinates kept in a pathfinding result
    pub const DEFAULT_PATH_CAPACITY: usize = 256;

    /// Player sight radius used by visibility refreshes
    pub const DEFAULT_SIGHT_RADIUS: i32 = 8;

    /// Light level written to tiles the player can see
    pub const FULL_LIGHT: f32 = 1.0;
}
