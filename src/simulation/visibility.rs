//! Visibility - which tiles a creature can see this tick
//!
//! Sight is a plain disc around the creature. There is no occlusion: a
//! creature sees through walls.

use crate::core::types::{TileCoord, Vec3};
use crate::world::map::TileMap;

/// Tiles strictly inside the sight disc that exist on the map
///
/// Recomputed from scratch every tick; the result is never stored on the
/// creature.
pub fn visible_tiles(map: &TileMap, position: Vec3, sight_radius: f64) -> Vec<TileCoord> {
    if sight_radius <= 0.0 {
        return Vec::new();
    }

    let radius_sq = sight_radius * sight_radius;
    let x_min = (position.x - sight_radius).floor() as i32;
    let x_max = (position.x + sight_radius).ceil() as i32;
    let y_min = (position.y - sight_radius).floor() as i32;
    let y_max = (position.y + sight_radius).ceil() as i32;

    let mut visible = Vec::new();
    for i in x_min..=x_max {
        for j in y_min..=y_max {
            let dx = position.x - i as f64;
            let dy = position.y - j as f64;
            if dx * dx + dy * dy < radius_sq {
                let coord = TileCoord::new(i, j);
                if map.get_tile(coord).is_some() {
                    visible.push(coord);
                }
            }
        }
    }
    visible
}
