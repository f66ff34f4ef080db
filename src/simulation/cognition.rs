//! Cognition - the per-tick decision loop for one creature
//!
//! The creature's state is its action stack. Each pass looks at the
//! front entry, rolls one die, and either does visible work, waits on the
//! movement queue, or pushes/pops the stack. A pass that only changes the
//! stack asks for another pass in the same tick, so a creature that
//! finishes walking starts its next job immediately instead of standing
//! still for a tick.
//!
//! Every branch that asks for another pass pops the stack, except Idle
//! pushing DigTile. That push is allowed at most once per tick after a
//! failed dig search, which bounds the loop.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::TileCoord;
use crate::entity::actions::ActionKind;
use crate::entity::creature::Creature;
use crate::mailbox::{Outbox, RenderRequest};
use crate::simulation::visibility::visible_tiles;
use crate::spatial::pathfinding::PathPlanner;
use crate::world::map::TileMap;

/// Everything a creature's decision may touch besides the creature itself
pub struct CognitionContext<'a> {
    pub map: &'a mut TileMap,
    pub planner: &'a dyn PathPlanner,
    pub config: &'a SimulationConfig,
    pub outbox: &'a Outbox,
    pub rng: &'a mut ChaCha8Rng,
}

/// Run the decision loop for one creature until it settles for this tick
///
/// Creatures standing off the map are skipped. An empty action stack is
/// an invariant violation and is returned as an error.
pub fn advance(creature: &mut Creature, ctx: &mut CognitionContext<'_>) -> Result<()> {
    if ctx.map.get_tile(creature.tile()).is_none() {
        tracing::trace!(creature = %creature.name, "not on the map, skipping");
        return Ok(());
    }

    let visible = visible_tiles(ctx.map, creature.position(), creature.sight_radius);
    let mut dig_search_failed = false;

    loop {
        let dice_roll: f64 = ctx.rng.gen();

        let Some(action) = creature.actions.front() else {
            tracing::error!(creature = %creature.name, id = %creature.id, "action stack is empty");
            return Err(SimError::EmptyActionStack {
                creature: creature.id,
            });
        };
        tracing::trace!(creature = %creature.name, action = action.name(), dice_roll, "dispatch");

        let decide_again = match action {
            ActionKind::Idle => idle(creature, ctx, dice_roll, dig_search_failed),
            ActionKind::WalkToTile => walk_to_tile(creature),
            ActionKind::DigTile => {
                let again = dig_tile(creature, ctx, &visible);
                dig_search_failed |= again;
                again
            }
            // Reserved for behaviours the engine does not run yet
            ActionKind::AttackCreature => false,
        };

        if !decide_again {
            return Ok(());
        }
    }
}

fn idle(
    creature: &mut Creature,
    ctx: &mut CognitionContext<'_>,
    dice_roll: f64,
    dig_search_failed: bool,
) -> bool {
    creature.set_animation_state("Idle", ctx.outbox);
    let config = ctx.config;
    let digger = creature.dig_rate > config.min_dig_rate;

    // Digging is off the table for the rest of this tick: spread the roll
    // over the wander/stay bands so their odds match a fresh re-roll
    let roll = if digger && dig_search_failed {
        config.dig_probability + dice_roll * (1.0 - config.dig_probability)
    } else {
        dice_roll
    };

    if digger && !dig_search_failed && roll < config.dig_probability {
        tracing::debug!(creature = %creature.name, "looking for tiles to dig");
        creature.actions.push_front(ActionKind::DigTile);
        return true;
    }

    if roll < config.wander_probability {
        wander(creature, ctx);
    }

    false
}

/// Walk to a random nearby tile
fn wander(creature: &mut Creature, ctx: &mut CognitionContext<'_>) {
    creature.actions.push_front(ActionKind::WalkToTile);

    let sigma = ctx.config.wander_sigma;
    let offset_x: f64 = ctx.rng.sample(StandardNormal);
    let offset_y: f64 = ctx.rng.sample(StandardNormal);
    let position = creature.position();
    let target = TileCoord::new(
        (position.x + sigma * offset_x) as i32,
        (position.y + sigma * offset_y) as i32,
    );

    let mut path = ctx
        .planner
        .path(ctx.map, creature.tile(), target, creature.passability);
    if path.len() < 2 {
        // The empty walk is popped next tick
        tracing::debug!(creature = %creature.name, %target, "no wander path");
        return;
    }

    creature.set_animation_state("Walk", ctx.outbox);
    ctx.planner
        .cut_corners(ctx.map, &mut path, creature.passability);
    follow_path(creature, &path, ctx.outbox);
}

fn walk_to_tile(creature: &mut Creature) -> bool {
    if !creature.walk_queue.is_empty() {
        return false;
    }
    tracing::debug!(creature = %creature.name, "walk finished");
    creature.actions.pop_front().is_some()
}

fn dig_tile(creature: &mut Creature, ctx: &mut CognitionContext<'_>, visible: &[TileCoord]) -> bool {
    let here = creature.tile();

    // Finish what is adjacent before looking further away
    let adjacent = ctx.map.neighbor_coords(here).into_iter().find(|&coord| {
        ctx.map
            .get_tile(coord)
            .is_some_and(|tile| tile.marked_for_digging())
    });
    if let Some(target) = adjacent {
        dig_adjacent(creature, ctx, target);
        return false;
    }

    let mut candidates = CandidatePaths::new(ctx.config.dig_candidate_cap);
    for &marked in visible {
        let is_marked = ctx
            .map
            .get_tile(marked)
            .is_some_and(|tile| tile.marked_for_digging());
        if !is_marked {
            continue;
        }
        for standing in ctx.map.neighbor_coords(marked) {
            if !ctx.map.is_passable(standing, creature.passability) {
                continue;
            }
            candidates.offer(
                ctx.planner
                    .path(ctx.map, here, standing, creature.passability),
            );
        }
    }

    if let Some(mut path) = candidates.choose(ctx.rng) {
        tracing::debug!(
            creature = %creature.name,
            destination = ?path.last(),
            steps = path.len(),
            "walking to dig site"
        );
        creature.set_animation_state("Walk", ctx.outbox);
        ctx.planner
            .cut_corners(ctx.map, &mut path, creature.passability);
        follow_path(creature, &path, ctx.outbox);
        creature.actions.push_front(ActionKind::WalkToTile);
        return false;
    }

    tracing::debug!(creature = %creature.name, "nothing reachable to dig");
    creature.actions.pop_front().is_some()
}

/// Take one bite out of an adjacent marked tile
fn dig_adjacent(creature: &mut Creature, ctx: &mut CognitionContext<'_>, target: TileCoord) {
    let Some(tile) = ctx.map.get_tile_mut(target) else {
        return;
    };
    tile.set_fullness(tile.fullness() - creature.dig_rate);
    let remaining = tile.fullness();

    creature.set_animation_state("Dig", ctx.outbox);
    tracing::debug!(creature = %creature.name, %target, remaining, "dig");

    // Neighbouring walls may have gained an exposed face
    ctx.outbox.render(RenderRequest::RefreshTile { coord: target });
    for neighbor in ctx.map.neighbor_coords(target) {
        ctx.outbox.render(RenderRequest::RefreshTile { coord: neighbor });
    }

    if remaining == 0.0 {
        creature.add_destination(target, ctx.outbox);
        creature.set_animation_state("Walk", ctx.outbox);
        creature.actions.replace_front(ActionKind::WalkToTile);
    }
}

/// Queue every tile after the first; the first is where the creature stands
fn follow_path(creature: &mut Creature, path: &[TileCoord], outbox: &Outbox) {
    for &tile in path.iter().skip(1) {
        creature.add_destination(tile, outbox);
    }
}

/// Bounded working set of the shortest paths seen so far
///
/// Approximate: once full, the longest member is evicted for each new
/// offer, so an early long path can outlive a later short one only until
/// the set fills again.
#[derive(Debug)]
struct CandidatePaths {
    cap: usize,
    paths: Vec<Vec<TileCoord>>,
}

impl CandidatePaths {
    fn new(cap: usize) -> Self {
        Self {
            cap,
            paths: Vec::with_capacity(cap + 1),
        }
    }

    /// Keep `path` if it is usable, evicting the longest when over the cap
    fn offer(&mut self, path: Vec<TileCoord>) {
        if path.len() < 2 {
            return;
        }
        self.paths.push(path);

        if self.paths.len() > self.cap {
            let longest = self
                .paths
                .iter()
                .enumerate()
                .max_by_key(|(_, p)| p.len())
                .map(|(i, _)| i);
            if let Some(index) = longest {
                self.paths.remove(index);
            }
        }
    }

    /// Pick one surviving path uniformly at random
    fn choose(mut self, rng: &mut ChaCha8Rng) -> Option<Vec<TileCoord>> {
        if self.paths.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.paths.len());
        Some(self.paths.swap_remove(index))
    }

    #[cfg(test)]
    fn lengths(&self) -> Vec<usize> {
        self.paths.iter().map(Vec::len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::core::types::{CreatureId, Vec3};
    use crate::entity::actions::ActionStack;
    use crate::entity::class::ClassCatalog;
    use crate::mailbox::Outbox;
    use crate::spatial::pathfinding::GridPlanner;

    fn line(len: usize) -> Vec<TileCoord> {
        (0..len as i32).map(|x| TileCoord::new(x, 0)).collect()
    }

    #[test]
    fn test_candidates_ignore_unusable_paths() {
        let mut candidates = CandidatePaths::new(6);
        candidates.offer(Vec::new());
        candidates.offer(line(1));
        assert!(candidates.lengths().is_empty());
    }

    #[test]
    fn test_candidates_evict_longest() {
        let mut candidates = CandidatePaths::new(3);
        for len in [5, 2, 9, 3] {
            candidates.offer(line(len));
        }
        assert_eq!(candidates.lengths(), vec![5, 2, 3]);

        candidates.offer(line(7));
        assert_eq!(candidates.lengths(), vec![5, 2, 3]);
    }

    #[test]
    fn test_candidates_cap_of_six() {
        let mut candidates = CandidatePaths::new(6);
        for len in 2..12 {
            candidates.offer(line(len));
        }
        assert_eq!(candidates.lengths(), vec![2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(CandidatePaths::new(6).choose(&mut rng).is_none());
    }

    #[test]
    fn test_off_map_creature_is_skipped() {
        let mut map = TileMap::open(3, 3);
        let (outbox, inbox) = Outbox::connected();
        let config = SimulationConfig::default();
        let planner = GridPlanner::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let catalog = ClassCatalog::with_defaults();
        let mut creature = Creature::from_class(
            CreatureId(1),
            "Lost".into(),
            catalog.get("Kobold").unwrap(),
            Vec3::new(40.0, 40.0, 0.0),
        );
        // Would be fatal if it were dispatched
        creature.actions = ActionStack::from_entries([]);

        let mut ctx = CognitionContext {
            map: &mut map,
            planner: &planner,
            config: &config,
            outbox: &outbox,
            rng: &mut rng,
        };
        assert!(advance(&mut creature, &mut ctx).is_ok());
        assert!(inbox.render.drain_all().is_empty());
    }
}
