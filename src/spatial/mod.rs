//! # Spatial Queries
//!
//! Per-turn queries against a finished level: breadth-first distance fields,
//! line of sight with tile reveal, and light propagation.

pub mod distance;
pub mod lighting;
pub mod sight;

pub use distance::*;
pub use lighting::*;
pub use sight::*;
