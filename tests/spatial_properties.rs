//! Property tests for sight and path smoothing

use proptest::prelude::*;

use deepkeep::core::types::{TileCoord, Vec3};
use deepkeep::simulation::visible_tiles;
use deepkeep::spatial::{cut_corners, GridPlanner, PathPlanner};
use deepkeep::world::map::TileMap;
use deepkeep::world::tile::{Passability, Tile};

/// 24x24 map with walls wherever `walls` has a set bit
fn walled_map(walls: &[bool]) -> TileMap {
    let mut map = TileMap::open(24, 24);
    for (i, &wall) in walls.iter().enumerate() {
        if wall {
            let coord = TileCoord::new((i % 24) as i32, (i / 24) as i32);
            map.insert(Tile::wall(coord));
        }
    }
    map
}

proptest! {
    #[test]
    fn prop_visible_iff_strictly_inside_disc(
        x in -2.0f64..26.0,
        y in -2.0f64..26.0,
        radius in 0.0f64..12.0,
    ) {
        let map = TileMap::open(24, 24);
        let position = Vec3::new(x, y, 0.0);
        let visible = visible_tiles(&map, position, radius);

        for tile in map.tiles() {
            let dx = x - tile.x() as f64;
            let dy = y - tile.y() as f64;
            let inside = dx * dx + dy * dy < radius * radius;
            prop_assert_eq!(visible.contains(&tile.coord), inside, "tile {}", tile.coord);
        }
        prop_assert!(visible.iter().all(|c| map.get_tile(*c).is_some()));
    }

    #[test]
    fn prop_cut_corners_is_idempotent(
        walls in prop::collection::vec(prop::bool::weighted(0.25), 24 * 24),
        sx in 0i32..24, sy in 0i32..24,
        ex in 0i32..24, ey in 0i32..24,
    ) {
        let map = walled_map(&walls);
        let walk = Passability::WALKABLE;
        let mut path = GridPlanner::default().path(
            &map,
            TileCoord::new(sx, sy),
            TileCoord::new(ex, ey),
            walk,
        );
        let found = path.clone();

        cut_corners(&map, &mut path, walk);
        let once = path.clone();
        cut_corners(&map, &mut path, walk);

        prop_assert_eq!(&path, &once);
        prop_assert_eq!(path.first(), found.first());
        prop_assert_eq!(path.last(), found.last());
        prop_assert!(path.iter().all(|c| found.contains(c)));
    }

    #[test]
    fn prop_paths_are_edge_connected_and_passable(
        walls in prop::collection::vec(prop::bool::weighted(0.2), 24 * 24),
        sx in 0i32..24, sy in 0i32..24,
        ex in 0i32..24, ey in 0i32..24,
    ) {
        let map = walled_map(&walls);
        let walk = Passability::WALKABLE;
        let path = GridPlanner::default().path(
            &map,
            TileCoord::new(sx, sy),
            TileCoord::new(ex, ey),
            walk,
        );

        for pair in path.windows(2) {
            prop_assert_eq!(pair[0].manhattan(&pair[1]), 1);
        }
        prop_assert!(path.iter().skip(1).all(|c| map.is_passable(*c, walk)));
    }
}
