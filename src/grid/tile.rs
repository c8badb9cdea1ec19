//! # Tiles
//!
//! Per-cell records: the type tag, the flag set derived from it, room
//! membership, the last distance-field value and the light pair the renderer
//! fades between.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// What occupies a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Solid rock
    Wall,
    /// Open room or corridor floor
    Floor,
    /// Door the player can open
    Door,
    /// Door that needs the gold key
    LockedDoor,
    /// Stairs out of the level
    Exit,
    /// Where the player arrives
    Start,
}

impl TileType {
    /// Flags a freshly stamped tile of this type carries.
    pub fn default_flags(self) -> TileFlags {
        match self {
            TileType::Wall | TileType::LockedDoor => TileFlags::BLOCKS_MOVEMENT,
            TileType::Door => TileFlags::PLAYER_ONLY,
            TileType::Floor | TileType::Exit | TileType::Start => TileFlags::empty(),
        }
    }

    /// The mask bit for this type.
    pub fn mask(self) -> TileTypeMask {
        match self {
            TileType::Wall => TileTypeMask::WALL,
            TileType::Floor => TileTypeMask::FLOOR,
            TileType::Door => TileTypeMask::DOOR,
            TileType::LockedDoor => TileTypeMask::LOCKED_DOOR,
            TileType::Exit => TileTypeMask::EXIT,
            TileType::Start => TileTypeMask::START,
        }
    }

    /// Anything that is not wall.
    pub fn is_open(self) -> bool {
        self != TileType::Wall
    }

    /// Either kind of door.
    pub fn is_door(self) -> bool {
        matches!(self, TileType::Door | TileType::LockedDoor)
    }

    /// ASCII glyph used by log dumps and the CLI.
    pub const fn to_char(self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::Door => '+',
            TileType::LockedDoor => 'L',
            TileType::Exit => '>',
            TileType::Start => '<',
        }
    }
}

bitflags! {
    /// Per-tile state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TileFlags: u8 {
        const BLOCKS_MOVEMENT = 1 << 0;
        const PLAYER_ONLY = 1 << 1;
        const VISIBLE = 1 << 2;
        const REVEALED = 1 << 3;
    }
}

bitflags! {
    /// A set of tile types, used to treat blocking types as passable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TileTypeMask: u8 {
        const WALL = 1 << 0;
        const FLOOR = 1 << 1;
        const DOOR = 1 << 2;
        const LOCKED_DOOR = 1 << 3;
        const EXIT = 1 << 4;
        const START = 1 << 5;
    }
}

impl TileTypeMask {
    /// True when `tile_type` is in the set.
    pub fn includes(self, tile_type: TileType) -> bool {
        self.contains(tile_type.mask())
    }
}

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// What the tile is
    pub tile_type: TileType,
    /// Movement and visibility bits
    pub flags: TileFlags,
    /// Index of the placed room containing this tile
    pub room: Option<usize>,
    /// Hops from the source of the last distance-field run
    pub distance: Option<u32>,
    /// Current light level
    pub light: f32,
    /// Light level the renderer fades towards
    pub light_target: f32,
}

impl Tile {
    /// Creates a tile of the given type with its default flags.
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            flags: tile_type.default_flags(),
            room: None,
            distance: None,
            light: 0.0,
            light_target: 0.0,
        }
    }

    /// Creates a wall tile.
    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }

    /// Creates a floor tile.
    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }

    /// Changes the type, replacing the movement bits and keeping visibility.
    pub fn set_type(&mut self, tile_type: TileType) {
        let seen = self.flags & (TileFlags::VISIBLE | TileFlags::REVEALED);
        self.tile_type = tile_type;
        self.flags = tile_type.default_flags() | seen;
    }

    /// Whether the tile stops movement and sight.
    pub fn blocks_movement(&self) -> bool {
        self.flags.contains(TileFlags::BLOCKS_MOVEMENT)
    }

    /// Whether only the player may enter.
    pub fn is_player_only(&self) -> bool {
        self.flags.contains(TileFlags::PLAYER_ONLY)
    }

    /// Whether a query may step onto this tile, treating `ignore` types as open.
    pub fn is_traversable(&self, ignore: TileTypeMask) -> bool {
        !self.blocks_movement() || ignore.includes(self.tile_type)
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(TileFlags::VISIBLE)
    }

    pub fn is_revealed(&self) -> bool {
        self.flags.contains(TileFlags::REVEALED)
    }

    /// Marks the tile as currently seen and remembered.
    pub fn reveal(&mut self) {
        self.flags.insert(TileFlags::VISIBLE | TileFlags::REVEALED);
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::wall()
    }
}
