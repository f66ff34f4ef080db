//! Dungeon map and tiles

pub mod map;
pub mod tile;

pub use map::{SharedMap, TileMap};
pub use tile::{Passability, Tile, TileKind, FULL_TILE};
