//! # Dungeon Generation
//!
//! The rooms-and-mazes level pipeline.
//!
//! Rooms are scattered first, every leftover odd/odd wall cell is grown into a
//! perfect maze, the resulting regions are merged into one through randomly
//! chosen connectors, the maze dead ends are retracted, and the connectors that
//! still sit on a straight corridor become doors. The last room gets the exit,
//! and the doors around it are locked behind a key placed elsewhere.

use super::{
    connect, doors, maze, placement, prune, rooms, utils, validate, GenerationConfig, Generator,
    Level,
};
use crate::{DelveResult, TileGrid};
use log::{debug, info, log_enabled, trace, Level as LogLevel};
use rand::rngs::StdRng;

/// Rooms-and-mazes level generator.
#[derive(Debug, Clone)]
pub struct LevelGenerator {
    /// Whether to run the full verification pass on every level
    pub verify: bool,
}

impl LevelGenerator {
    /// Creates a generator that verifies every level it builds.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GenerationConfig, LevelGenerator};
    ///
    /// let level = LevelGenerator::new()
    ///     .try_generate(&GenerationConfig::for_testing(3))
    ///     .unwrap();
    /// assert!(!level.rooms.is_empty());
    /// ```
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Seeds an RNG from the config and builds a level.
    pub fn try_generate(&self, config: &GenerationConfig) -> DelveResult<Level> {
        let mut rng = utils::create_rng(config);
        self.generate(config, &mut rng)
    }

    fn dump_stage(stage: &str, grid: &TileGrid) {
        if log_enabled!(LogLevel::Trace) {
            trace!("after {}:\n{}", stage, grid);
        }
    }
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<Level> for LevelGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Level> {
        config.validate()?;
        let mut grid = TileGrid::new(config.width, config.height);

        let rooms = rooms::place_rooms(&mut grid, config, rng);
        debug!(
            "placed {} rooms in {} attempts",
            rooms.len(),
            config.room_attempts
        );
        Self::dump_stage("room placement", &grid);

        let region_count = maze::carve_mazes(&mut grid, rooms.len() as u32, rng);
        debug!(
            "carved {} maze regions",
            region_count as usize - rooms.len()
        );
        Self::dump_stage("maze carving", &grid);

        let candidates = connect::connect_regions(&mut grid, rng);
        debug!("opened {} connectors", candidates.len());
        validate::check_regions_unified(&grid)?;
        Self::dump_stage("region merging", &grid);

        let pruned = prune::remove_dead_ends(&mut grid);
        debug!("pruned {} dead-end tiles", pruned);
        Self::dump_stage("dead-end pruning", &grid);

        let door_count = doors::place_doors(&mut grid, &candidates);
        debug!(
            "{} of {} connectors became doors",
            door_count,
            candidates.len()
        );
        let exit = doors::place_exit(&mut grid, &rooms, rng);

        let mut level = Level {
            seed: config.seed,
            grid,
            rooms,
            start: None,
            exit,
            key: None,
            monster_spawns: Vec::new(),
        };
        placement::populate(&mut level, config, rng);
        Self::dump_stage("placement", &level.grid);

        if self.verify {
            self.validate(&level, config)?;
        }

        info!(
            "generated {}x{} level from seed {}: {} rooms, {} doors, exit {:?}, key {:?}",
            config.width,
            config.height,
            config.seed,
            level.rooms.len(),
            door_count,
            level.exit,
            level.key
        );
        Ok(level)
    }

    fn validate(&self, level: &Level, _config: &GenerationConfig) -> DelveResult<()> {
        validate::validate_level(level)
    }

    fn generator_type(&self) -> &'static str {
        "LevelGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DelveError, Position, TileType};

    #[test]
    fn test_level_generator_creation() {
        let generator = LevelGenerator::new();
        assert!(generator.verify);
        assert_eq!(generator.generator_type(), "LevelGenerator");
    }

    #[test]
    fn test_generation_with_small_level() {
        let config = GenerationConfig::for_testing(12345);
        let level = LevelGenerator::new().try_generate(&config).unwrap();

        assert_eq!(level.grid.width(), config.width);
        assert_eq!(level.grid.height(), config.height);
        assert_eq!(level.seed, 12345);
        assert!(!level.rooms.is_empty());
        assert!(level.grid.count_type(TileType::Floor) > 0);
        assert_eq!(level.grid.count_type(TileType::Exit), 1);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = GenerationConfig::new(777);
        let first = LevelGenerator::new().try_generate(&config).unwrap();
        let second = LevelGenerator::new().try_generate(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = GenerationConfig::new(1).with_size(20, 21);
        let result = LevelGenerator::new().try_generate(&config);
        assert!(matches!(result, Err(DelveError::InvalidConfig(_))));
    }

    #[test]
    fn test_edge_ring_stays_wall() {
        let level = LevelGenerator::new()
            .try_generate(&GenerationConfig::new(31))
            .unwrap();
        let grid = &level.grid;
        for pos in grid.positions().filter(|&pos| grid.is_edge(pos)) {
            assert_eq!(grid.tile_type(pos), Some(TileType::Wall), "edge {}", pos);
        }
        assert!(!grid.is_open(Position::new(0, 0)));
    }
}
