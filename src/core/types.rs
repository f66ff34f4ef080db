//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Unique identifier for creatures
///
/// Ids are handed out by the simulation in spawn order and never reused
/// within one run.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[display(fmt = "creature#{}", _0)]
pub struct CreatureId(pub u32);

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Integer tile coordinate on the dungeon map
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[display(fmt = "({}, {})", x, y)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four edge-adjacent coordinates, in +x, -x, +y, -y order
    pub fn neighbors(&self) -> [TileCoord; 4] {
        [
            TileCoord::new(self.x + 1, self.y),
            TileCoord::new(self.x - 1, self.y),
            TileCoord::new(self.x, self.y + 1),
            TileCoord::new(self.x, self.y - 1),
        ]
    }

    pub fn manhattan(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True when `other` touches this tile only at a corner
    pub fn is_diagonal_to(&self, other: &Self) -> bool {
        self.x.abs_diff(other.x) == 1 && self.y.abs_diff(other.y) == 1
    }

    /// Floor-level world position of this tile
    pub fn to_position(self) -> Vec3 {
        Vec3::new(self.x as f64, self.y as f64, 0.0)
    }
}

/// Continuous world position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::default()
        }
    }

    /// Tile under this position, truncating toward zero
    pub fn tile(&self) -> TileCoord {
        TileCoord::new(self.x as i32, self.y as i32)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_truncates_to_tile() {
        assert_eq!(Vec3::new(3.9, 4.1, 0.0).tile(), TileCoord::new(3, 4));
        // Truncation, not floor
        assert_eq!(Vec3::new(-0.5, 2.0, 0.0).tile(), TileCoord::new(0, 2));
    }

    #[test]
    fn test_neighbors_are_edge_adjacent() {
        let center = TileCoord::new(5, 5);
        for n in center.neighbors() {
            assert_eq!(center.manhattan(&n), 1);
        }
    }

    #[test]
    fn test_diagonal_detection() {
        let a = TileCoord::new(2, 2);
        assert!(a.is_diagonal_to(&TileCoord::new(3, 3)));
        assert!(a.is_diagonal_to(&TileCoord::new(1, 3)));
        assert!(!a.is_diagonal_to(&TileCoord::new(3, 2)));
        assert!(!a.is_diagonal_to(&TileCoord::new(4, 4)));
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec3::default().normalize(), Vec3::default());
        let unit = Vec3::new(3.0, 4.0, 0.0).normalize();
        assert!((unit.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(CreatureId(7).to_string(), "creature#7");
        assert_eq!(TileCoord::new(3, -1).to_string(), "(3, -1)");
    }
}
