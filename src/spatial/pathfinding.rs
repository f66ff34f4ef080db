//! A* pathfinding over the tile map
//!
//! Paths run over edge-adjacent tiles; `cut_corners` then replaces
//! L-shaped steps with diagonal moves where both flanking tiles are open.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::core::types::TileCoord;
use crate::world::map::TileMap;
use crate::world::tile::Passability;

/// Path search over a tile map
///
/// A returned path runs from `start` to `end`, both inclusive. Fewer than
/// two tiles means there is no usable path.
pub trait PathPlanner: Send + Sync {
    fn path(
        &self,
        map: &TileMap,
        start: TileCoord,
        end: TileCoord,
        passability: Passability,
    ) -> Vec<TileCoord>;

    /// Remove tiles whose omission still leaves a passable diagonal step
    fn cut_corners(&self, map: &TileMap, path: &mut Vec<TileCoord>, passability: Passability) {
        cut_corners(map, path, passability);
    }
}

/// Open-set entry: lowest f-cost pops first, ties broken by coordinate
type OpenEntry = Reverse<(OrderedFloat<f64>, (i32, i32))>;

fn open_entry(coord: TileCoord, f_cost: f64) -> OpenEntry {
    Reverse((OrderedFloat(f_cost), (coord.x, coord.y)))
}

/// A* over edge-adjacent tiles with a bounded number of expansions
#[derive(Debug, Clone)]
pub struct GridPlanner {
    /// Give up after expanding this many nodes
    pub max_expansions: usize,
}

impl Default for GridPlanner {
    fn default() -> Self {
        Self {
            max_expansions: 4096,
        }
    }
}

impl GridPlanner {
    pub fn new(max_expansions: usize) -> Self {
        Self { max_expansions }
    }
}

impl PathPlanner for GridPlanner {
    fn path(
        &self,
        map: &TileMap,
        start: TileCoord,
        end: TileCoord,
        passability: Passability,
    ) -> Vec<TileCoord> {
        if map.get_tile(start).is_none() || !map.is_passable(end, passability) {
            return Vec::new();
        }
        if start == end {
            return vec![start];
        }

        let heuristic = |c: TileCoord| c.manhattan(&end) as f64;

        let mut open_set: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut came_from: AHashMap<TileCoord, TileCoord> = AHashMap::new();
        let mut g_scores: AHashMap<TileCoord, f64> = AHashMap::new();

        g_scores.insert(start, 0.0);
        open_set.push(open_entry(start, heuristic(start)));

        let mut expansions = 0;
        while let Some(Reverse((_, (x, y)))) = open_set.pop() {
            let current = TileCoord::new(x, y);
            if current == end {
                return reconstruct_path(&came_from, current);
            }

            expansions += 1;
            if expansions > self.max_expansions {
                break;
            }

            let current_g = *g_scores.get(&current).unwrap_or(&f64::INFINITY);

            for neighbor in current.neighbors() {
                if !map.is_passable(neighbor, passability) {
                    continue;
                }

                let tentative_g = current_g + 1.0;
                let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f64::INFINITY);

                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current);
                    g_scores.insert(neighbor, tentative_g);
                    open_set.push(open_entry(neighbor, tentative_g + heuristic(neighbor)));
                }
            }
        }

        Vec::new()
    }
}

/// Follow parent links back from `end`, then flip to start-first order
fn reconstruct_path(came_from: &AHashMap<TileCoord, TileCoord>, end: TileCoord) -> Vec<TileCoord> {
    let mut path: Vec<TileCoord> =
        std::iter::successors(Some(end), |tile| came_from.get(tile).copied()).collect();
    path.reverse();
    path
}

/// Replace L-shaped steps with diagonal ones, in place
///
/// The middle tile of `a -> b -> c` is dropped when `a` and `c` touch at a
/// corner and both tiles flanking that corner are passable. Runs to a
/// fixed point, so applying it again changes nothing.
pub fn cut_corners(map: &TileMap, path: &mut Vec<TileCoord>, passability: Passability) {
    loop {
        let mut changed = false;
        let mut i = 0;
        while i + 2 < path.len() {
            let (a, c) = (path[i], path[i + 2]);
            if a.is_diagonal_to(&c)
                && map.is_passable(TileCoord::new(a.x, c.y), passability)
                && map.is_passable(TileCoord::new(c.x, a.y), passability)
            {
                path.remove(i + 1);
                changed = true;
            } else {
                i += 1;
            }
        }
        if !changed {
            break;
        }
    }
}
