//! Dungeon tiles: terrain kind, fullness, dig marks and occupants

use serde::{Deserialize, Serialize};

use crate::core::types::{CreatureId, TileCoord};

/// Fullness of an untouched wall tile
pub const FULL_TILE: f64 = 100.0;

/// Capability bitset describing which terrain a creature may traverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Passability(pub u8);

impl Passability {
    pub const NONE: Self = Self(0);
    pub const WALKABLE: Self = Self(1);
    pub const FLYABLE: Self = Self(1 << 1);
    pub const SWIMMABLE: Self = Self(1 << 2);

    /// True if any capability bit is shared
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for Passability {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Terrain material of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Dirt,
    Gold,
    Rock,
    Water,
    Lava,
}

impl TileKind {
    /// Whether creatures can excavate this material
    pub fn is_diggable(self) -> bool {
        matches!(self, TileKind::Dirt | TileKind::Gold)
    }
}

/// A single map cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub coord: TileCoord,
    pub kind: TileKind,
    fullness: f64,
    marked_for_digging: bool,
    creatures: Vec<CreatureId>,
}

impl Tile {
    pub fn new(coord: TileCoord, kind: TileKind, fullness: f64) -> Self {
        Self {
            coord,
            kind,
            fullness: fullness.max(0.0),
            marked_for_digging: false,
            creatures: Vec::new(),
        }
    }

    /// An excavated dirt floor
    pub fn floor(coord: TileCoord) -> Self {
        Self::new(coord, TileKind::Dirt, 0.0)
    }

    /// A solid dirt wall
    pub fn wall(coord: TileCoord) -> Self {
        Self::new(coord, TileKind::Dirt, FULL_TILE)
    }

    pub fn x(&self) -> i32 {
        self.coord.x
    }

    pub fn y(&self) -> i32 {
        self.coord.y
    }

    pub fn fullness(&self) -> f64 {
        self.fullness
    }

    /// Set the remaining solid quantity, floored at zero
    ///
    /// A tile dug out completely loses its dig mark.
    pub fn set_fullness(&mut self, fullness: f64) {
        self.fullness = fullness.max(0.0);
        if self.fullness == 0.0 {
            self.marked_for_digging = false;
        }
    }

    pub fn marked_for_digging(&self) -> bool {
        self.marked_for_digging
    }

    /// Mark or unmark the tile; returns whether the mark took effect
    ///
    /// Only solid, diggable tiles can carry a mark.
    pub fn set_marked_for_digging(&mut self, marked: bool) -> bool {
        if marked && (!self.kind.is_diggable() || self.fullness == 0.0) {
            return false;
        }
        self.marked_for_digging = marked;
        true
    }

    /// Capabilities that allow entering this tile
    pub fn passability(&self) -> Passability {
        if self.fullness > 0.0 {
            return Passability::NONE;
        }
        match self.kind {
            TileKind::Dirt | TileKind::Gold | TileKind::Rock => {
                Passability::WALKABLE | Passability::FLYABLE
            }
            TileKind::Water => Passability::SWIMMABLE | Passability::FLYABLE,
            TileKind::Lava => Passability::FLYABLE,
        }
    }

    pub fn is_passable_for(&self, mask: Passability) -> bool {
        self.passability().intersects(mask)
    }

    pub fn creatures(&self) -> &[CreatureId] {
        &self.creatures
    }

    pub fn add_creature(&mut self, creature: CreatureId) {
        if !self.creatures.contains(&creature) {
            self.creatures.push(creature);
        }
    }

    pub fn remove_creature(&mut self, creature: CreatureId) {
        self.creatures.retain(|&c| c != creature);
    }

    /// Name of the mesh variant the renderer should show for this fullness
    pub fn mesh_name(&self) -> &'static str {
        match (self.kind, self.fullness) {
            (TileKind::Water, _) => "Water",
            (TileKind::Lava, _) => "Lava",
            (_, f) if f == 0.0 => "Floor",
            (TileKind::Rock, _) => "Rock",
            (TileKind::Gold, _) => "Gold",
            (TileKind::Dirt, f) if f < FULL_TILE * 0.5 => "DirtHalf",
            (TileKind::Dirt, _) => "Dirt",
        }
    }
}
