//! Tile map - the spatial index of the dungeon
//!
//! Answers tile lookups by integer coordinate and tracks which creatures
//! occupy which tile. Coordinates outside the map (or holes inside it)
//! resolve to `None`.

use std::sync::{Arc, RwLock};

use ahash::AHashMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{CreatureId, TileCoord};
use crate::world::tile::{Passability, Tile, TileKind, FULL_TILE};

/// Map shared between the simulation thread (sole writer) and readers
/// such as the renderer or network snapshotter
pub type SharedMap = Arc<RwLock<TileMap>>;

#[derive(Debug, Clone, Default)]
pub struct TileMap {
    tiles: AHashMap<TileCoord, Tile>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `width` x `height` map with every tile set to dug-out floor
    pub fn open(width: i32, height: i32) -> Self {
        let mut map = Self::new();
        for y in 0..height {
            for x in 0..width {
                map.insert(Tile::floor(TileCoord::new(x, y)));
            }
        }
        map
    }

    /// Build a map from character rows; row `n` is `y = n`
    ///
    /// `.` floor, `#` dirt wall, `*` dirt wall marked for digging,
    /// `$` gold, `R` rock, `~` water, `^` lava, space = no tile.
    pub fn from_ascii(rows: &str) -> Result<Self> {
        let mut map = Self::new();
        for (y, line) in rows.lines().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let coord = TileCoord::new(x as i32, y as i32);
                let tile = match ch {
                    ' ' => continue,
                    '.' => Tile::floor(coord),
                    '#' => Tile::wall(coord),
                    '*' => {
                        let mut tile = Tile::wall(coord);
                        tile.set_marked_for_digging(true);
                        tile
                    }
                    '$' => Tile::new(coord, TileKind::Gold, FULL_TILE),
                    'R' => Tile::new(coord, TileKind::Rock, FULL_TILE),
                    '~' => Tile::new(coord, TileKind::Water, 0.0),
                    '^' => Tile::new(coord, TileKind::Lava, 0.0),
                    other => {
                        return Err(SimError::Parse {
                            line: y + 1,
                            reason: format!("unknown tile character '{}'", other),
                        })
                    }
                };
                map.insert(tile);
            }
        }
        Ok(map)
    }

    pub fn into_shared(self) -> SharedMap {
        Arc::new(RwLock::new(self))
    }

    /// Insert or replace a tile
    pub fn insert(&mut self, tile: Tile) {
        self.tiles.insert(tile.coord, tile);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn get_tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    #[inline]
    pub fn get_tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(&coord)
    }

    /// Up to four edge-adjacent tiles that exist on the map
    pub fn neighbor_tiles(&self, coord: TileCoord) -> Vec<&Tile> {
        coord
            .neighbors()
            .iter()
            .filter_map(|n| self.tiles.get(n))
            .collect()
    }

    /// Coordinates of the existing edge-adjacent tiles
    pub fn neighbor_coords(&self, coord: TileCoord) -> Vec<TileCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.tiles.contains_key(n))
            .collect()
    }

    pub fn is_passable(&self, coord: TileCoord, mask: Passability) -> bool {
        self.get_tile(coord)
            .map(|t| t.is_passable_for(mask))
            .unwrap_or(false)
    }

    /// Record `creature` as standing on `coord`; no-op off the map
    pub fn add_creature(&mut self, coord: TileCoord, creature: CreatureId) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.add_creature(creature);
        }
    }

    pub fn remove_creature(&mut self, coord: TileCoord, creature: CreatureId) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.remove_creature(creature);
        }
    }

    /// Mark a tile for digging; returns false if the tile cannot be marked
    pub fn mark_for_digging(&mut self, coord: TileCoord, marked: bool) -> bool {
        self.tiles
            .get_mut(&coord)
            .map(|t| t.set_marked_for_digging(marked))
            .unwrap_or(false)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }
}
