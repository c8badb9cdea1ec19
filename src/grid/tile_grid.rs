//! # Tile Grid
//!
//! Owns the tile array for one level and the parallel region array the
//! generator uses to track which carved area each cell belongs to.

use super::{Direction, Position, Tile, TileType};
use crate::config::{MAX_DIMENSION, MIN_DIMENSION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation-time label for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Permanent map border, never carved
    Edge,
    /// Wall that belongs to no carved area
    Unassigned,
    /// A carved room or maze tree
    Id(u32),
}

impl Region {
    /// The region id, if the cell has been carved.
    pub fn id(self) -> Option<u32> {
        match self {
            Region::Id(id) => Some(id),
            Region::Edge | Region::Unassigned => None,
        }
    }
}

/// A width x height grid of tiles with odd dimensions.
///
/// Rooms and corridors are laid out on odd coordinates, so both sides must be
/// odd. The outermost ring is the permanent edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    regions: Vec<Region>,
}

impl TileGrid {
    /// Allocates an all-wall grid.
    ///
    /// # Panics
    ///
    /// Panics if either side is even or outside
    /// `MIN_DIMENSION..=MAX_DIMENSION`, or if the tile array cannot be
    /// allocated. Both are unrecoverable for a level build.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Position, Region, TileGrid, TileType};
    ///
    /// let grid = TileGrid::new(7, 5);
    /// assert_eq!(grid.area(), 35);
    /// assert_eq!(grid.get(Position::new(3, 2)).unwrap().tile_type, TileType::Wall);
    /// assert_eq!(grid.region(Position::new(0, 2)), Region::Edge);
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width % 2 == 1 && height % 2 == 1,
            "grid dimensions must be odd, got {}x{}",
            width,
            height
        );
        assert!(
            (MIN_DIMENSION..=MAX_DIMENSION).contains(&width)
                && (MIN_DIMENSION..=MAX_DIMENSION).contains(&height),
            "grid dimensions must be within {}..={}, got {}x{}",
            MIN_DIMENSION,
            MAX_DIMENSION,
            width,
            height
        );

        let area = (width * height) as usize;
        let mut tiles = Vec::new();
        let mut regions = Vec::new();
        if let Err(err) = tiles
            .try_reserve_exact(area)
            .and_then(|_| regions.try_reserve_exact(area))
        {
            panic!("cannot allocate a {}x{} tile grid: {}", width, height, err);
        }
        tiles.resize(area, Tile::wall());

        for y in 0..height {
            for x in 0..width {
                let on_edge = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                regions.push(if on_edge { Region::Edge } else { Region::Unassigned });
            }
        }

        Self {
            width,
            height,
            tiles,
            regions,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    pub fn area(&self) -> usize {
        self.tiles.len()
    }

    /// Checks that a position lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    /// Checks that a position lies on the outermost ring.
    pub fn is_edge(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x == self.width as i32 - 1
                || pos.y == self.height as i32 - 1)
    }

    /// Flat index of a position, if it is on the grid.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Position of a flat index.
    pub fn position_of(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    /// Bounds-checked tile access.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index_of(pos).map(|index| &self.tiles[index])
    }

    /// Bounds-checked mutable tile access.
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index_of(pos).map(move |index| &mut self.tiles[index])
    }

    /// The tile one step from `pos` in `direction`; `Direction::Here` is `pos` itself.
    pub fn get_adjacent(&self, pos: Position, direction: Direction) -> Option<&Tile> {
        self.get(pos.step(direction))
    }

    /// Type of the tile at `pos`, if on the grid.
    pub fn tile_type(&self, pos: Position) -> Option<TileType> {
        self.get(pos).map(|tile| tile.tile_type)
    }

    /// Whether `pos` is on the grid and not wall.
    pub fn is_open(&self, pos: Position) -> bool {
        self.tile_type(pos).is_some_and(TileType::is_open)
    }

    /// Whether `pos` is on the grid and holds a movement-blocking tile.
    ///
    /// Off-grid positions count as blocking.
    pub fn blocks(&self, pos: Position) -> bool {
        self.get(pos).map_or(true, Tile::blocks_movement)
    }

    /// Changes a tile's type, re-deriving its movement flags.
    pub fn set_type(&mut self, pos: Position, tile_type: TileType) {
        if let Some(tile) = self.get_mut(pos) {
            tile.set_type(tile_type);
        }
    }

    /// Region label of `pos`; off-grid reads as `Region::Edge`.
    pub fn region(&self, pos: Position) -> Region {
        self.index_of(pos)
            .map_or(Region::Edge, |index| self.regions[index])
    }

    pub fn set_region(&mut self, pos: Position, region: Region) {
        if let Some(index) = self.index_of(pos) {
            self.regions[index] = region;
        }
    }

    /// Turns `pos` into floor belonging to `region`.
    pub fn carve(&mut self, pos: Position, region: u32) {
        self.set_type(pos, TileType::Floor);
        self.set_region(pos, Region::Id(region));
    }

    /// Turns `pos` back into unassigned wall outside any room.
    pub fn fill(&mut self, pos: Position) {
        if let Some(tile) = self.get_mut(pos) {
            tile.set_type(TileType::Wall);
            tile.room = None;
        }
        self.set_region(pos, Region::Unassigned);
    }

    /// Relabels every cell of region `from` as region `to`.
    ///
    /// Full-array scan, so each call costs O(area).
    pub fn relabel_region(&mut self, from: u32, to: u32) {
        for region in self.regions.iter_mut() {
            if *region == Region::Id(from) {
                *region = Region::Id(to);
            }
        }
    }

    /// Distinct carved region ids, ascending.
    pub fn region_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.regions.iter().filter_map(|region| region.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.area()).map(move |index| self.position_of(index))
    }

    /// All tiles with their positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(index, tile)| (self.position_of(index), tile))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Positions of every tile of the given type.
    pub fn positions_of_type(&self, tile_type: TileType) -> Vec<Position> {
        self.iter()
            .filter(|(_, tile)| tile.tile_type == tile_type)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Counts tiles of the given type.
    pub fn count_type(&self, tile_type: TileType) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.tile_type == tile_type)
            .count()
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width as usize) {
            for tile in row {
                write!(f, "{}", tile.tile_type.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
