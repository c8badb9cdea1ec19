//! # Utilities Module
//!
//! Grid line rasterising and A* pathfinding.

pub mod math;
pub mod pathfinding;

pub use math::*;
pub use pathfinding::*;
