//! Tick system - orchestrates simulation updates
//!
//! Each tick runs, for every live creature in spawn order:
//! visibility -> cognition (until the creature settles)
//! and then movement integration for all creatures.
//!
//! The simulation owns the producer ends of the render and network
//! mailboxes and is the only writer of the shared map. It holds the map's
//! write guard for the duration of one phase; readers on other threads
//! see the map between phases.

use std::sync::{PoisonError, RwLockWriteGuard};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{CreatureId, Tick, TileCoord, Vec3};
use crate::entity::class::{ClassCatalog, CreatureSpec};
use crate::entity::creature::Creature;
use crate::mailbox::Outbox;
use crate::simulation::cognition::{advance, CognitionContext};
use crate::simulation::movement::integrate;
use crate::spatial::pathfinding::{GridPlanner, PathPlanner};
use crate::world::map::{SharedMap, TileMap};

pub struct Simulation {
    config: SimulationConfig,
    map: SharedMap,
    planner: Box<dyn PathPlanner>,
    classes: ClassCatalog,
    creatures: Vec<Creature>,
    outbox: Outbox,
    rng: ChaCha8Rng,
    next_id: u32,
    current_tick: Tick,
}

fn write_map(map: &SharedMap) -> RwLockWriteGuard<'_, TileMap> {
    map.write().unwrap_or_else(PoisonError::into_inner)
}

impl Simulation {
    pub fn new(
        config: SimulationConfig,
        map: TileMap,
        classes: ClassCatalog,
        outbox: Outbox,
    ) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            map: map.into_shared(),
            planner: Box::new(GridPlanner::default()),
            classes,
            creatures: Vec::new(),
            outbox,
            rng,
            next_id: 1,
            current_tick: 0,
        })
    }

    /// Replace the default A* planner
    pub fn with_planner(mut self, planner: impl PathPlanner + 'static) -> Self {
        self.planner = Box::new(planner);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Handle for read-only access from other threads
    pub fn shared_map(&self) -> SharedMap {
        SharedMap::clone(&self.map)
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn classes(&self) -> &ClassCatalog {
        &self.classes
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    /// Spawn a creature of `class_name`; `None` generates a name
    pub fn spawn(
        &mut self,
        class_name: &str,
        name: Option<&str>,
        position: Vec3,
    ) -> Result<CreatureId> {
        if self.classes.get(class_name).is_none() {
            return Err(SimError::UnknownCreatureClass(class_name.to_string()));
        }
        let name = match name {
            Some(name) => name.to_string(),
            None => self.classes.autoname(class_name),
        };

        self.spawn_spec(CreatureSpec {
            class_name: class_name.to_string(),
            name,
            position,
            color: 0,
        })
    }

    pub fn spawn_spec(&mut self, spec: CreatureSpec) -> Result<CreatureId> {
        let class = self
            .classes
            .get(&spec.class_name)
            .ok_or_else(|| SimError::UnknownCreatureClass(spec.class_name.clone()))?;
        let id = CreatureId(self.next_id);
        let creature = Creature::from_spec(id, spec, class);
        self.next_id += 1;

        creature.place_on_map(&mut write_map(&self.map));
        creature.create_mesh(&self.outbox);

        tracing::info!(%id, name = %creature.name, class = %creature.class_name, "spawned creature");
        self.creatures.push(creature);
        Ok(id)
    }

    /// Spawn every creature described in a level file body
    ///
    /// One `className name x y z color` per line; blank lines and lines
    /// starting with `#` are skipped.
    pub fn load_creatures(&mut self, text: &str) -> Result<Vec<CreatureId>> {
        let mut ids = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let spec = self.classes.parse_creature_line(line, index + 1)?;
            ids.push(self.spawn_spec(spec)?);
        }
        Ok(ids)
    }

    /// All creatures in level-file form, one per line
    pub fn save_creatures(&self) -> String {
        self.creatures
            .iter()
            .map(|c| format!("{}\n", c))
            .collect()
    }

    /// Remove a creature from the map and hand its teardown to the renderer
    pub fn despawn(&mut self, id: CreatureId) -> Result<()> {
        let index = self
            .creatures
            .iter()
            .position(|c| c.id == id)
            .ok_or(SimError::CreatureNotFound(id))?;
        let creature = self.creatures.remove(index);

        tracing::info!(%id, name = %creature.name, "despawning creature");
        creature.delete(&mut write_map(&self.map), &self.outbox);
        Ok(())
    }

    /// Player command: flag a wall for the diggers
    pub fn mark_for_digging(&self, coord: TileCoord, marked: bool) -> bool {
        let changed = write_map(&self.map).mark_for_digging(coord, marked);
        if changed {
            tracing::debug!(%coord, marked, "dig mark changed");
        }
        changed
    }

    /// Run every creature's decision loop once
    ///
    /// Stops at the first invariant violation; creatures after the failing
    /// one do not act this tick.
    pub fn run_cognition(&mut self) -> Result<()> {
        let Self {
            config,
            map,
            planner,
            creatures,
            outbox,
            rng,
            ..
        } = self;

        let mut tiles = write_map(map);
        let mut ctx = CognitionContext {
            map: &mut *tiles,
            planner: &**planner,
            config,
            outbox,
            rng,
        };

        for creature in creatures.iter_mut() {
            advance(creature, &mut ctx)?;
        }
        Ok(())
    }

    /// Walk every creature `dt` seconds along its waypoints
    pub fn step_movement(&mut self, dt: f64) {
        let mut tiles = write_map(&self.map);
        for creature in self.creatures.iter_mut() {
            integrate(
                creature,
                &mut tiles,
                &self.outbox,
                dt,
                self.config.arrival_epsilon,
            );
        }
    }

    /// Advance the simulation one tick of `dt` seconds
    pub fn tick(&mut self, dt: f64) -> Result<()> {
        self.run_cognition()?;
        self.step_movement(dt);
        self.current_tick += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::actions::ActionStack;
    use crate::mailbox::{Outbox, RenderRequest};

    fn sim_with(map: TileMap) -> (Simulation, crate::mailbox::Inbox) {
        let (outbox, inbox) = Outbox::connected();
        let sim = Simulation::new(
            SimulationConfig::default(),
            map,
            ClassCatalog::with_defaults(),
            outbox,
        )
        .unwrap();
        (sim, inbox)
    }

    #[test]
    fn test_spawn_places_and_creates_mesh() {
        let (mut sim, inbox) = sim_with(TileMap::open(5, 5));
        let id = sim.spawn("Kobold", None, Vec3::new(2.0, 3.0, 0.0)).unwrap();

        assert_eq!(sim.creature(id).unwrap().name, "Kobold_0001");
        let map = sim.shared_map();
        let tiles = map.read().unwrap();
        assert_eq!(tiles.get_tile(TileCoord::new(2, 3)).unwrap().creatures(), &[id]);
        assert!(matches!(
            inbox.render.drain_all().as_slice(),
            [RenderRequest::CreateMesh { .. }]
        ));
    }

    #[test]
    fn test_spawn_unknown_class() {
        let (mut sim, _inbox) = sim_with(TileMap::open(5, 5));
        assert!(matches!(
            sim.spawn("Dragon", Some("Smaug"), Vec3::default()),
            Err(SimError::UnknownCreatureClass(_))
        ));
        assert!(sim.creatures().is_empty());
    }

    #[test]
    fn test_despawn_unknown() {
        let (mut sim, _inbox) = sim_with(TileMap::open(5, 5));
        assert!(matches!(
            sim.despawn(CreatureId(99)),
            Err(SimError::CreatureNotFound(CreatureId(99)))
        ));
    }

    #[test]
    fn test_load_and_save_round_trip_lines() {
        let (mut sim, _inbox) = sim_with(TileMap::open(10, 10));
        let ids = sim
            .load_creatures("# level 1\nKobold Digger 1 2 0 3\n\nGoblin autoname 4 4 0 1\n")
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(
            sim.save_creatures(),
            "Kobold\tDigger\t1\t2\t0\t3\nGoblin\tGoblin_0001\t4\t4\t0\t1\n"
        );
    }

    #[test]
    fn test_empty_stack_halts_tick() {
        let (mut sim, _inbox) = sim_with(TileMap::open(5, 5));
        let id = sim.spawn("Kobold", Some("Broken"), Vec3::new(1.0, 1.0, 0.0)).unwrap();
        sim.creature_mut(id).unwrap().actions = ActionStack::from_entries([]);

        let err = sim.tick(1.0).unwrap_err();
        assert!(matches!(err, SimError::EmptyActionStack { creature } if creature == id));
        assert_eq!(sim.current_tick(), 0);
    }

    /// Planner that never finds a way anywhere
    struct Walled;

    impl PathPlanner for Walled {
        fn path(
            &self,
            _map: &TileMap,
            _start: TileCoord,
            _end: TileCoord,
            _passability: crate::world::tile::Passability,
        ) -> Vec<TileCoord> {
            Vec::new()
        }
    }

    #[test]
    fn test_custom_planner_is_used() {
        let (outbox, _inbox) = Outbox::connected();
        let mut sim = Simulation::new(
            SimulationConfig::default(),
            TileMap::open(12, 12),
            ClassCatalog::with_defaults(),
            outbox,
        )
        .unwrap()
        .with_planner(Walled);
        let id = sim.spawn("Goblin", None, Vec3::new(6.0, 6.0, 0.0)).unwrap();

        for _ in 0..100 {
            sim.tick(0.1).unwrap();
            let goblin = sim.creature(id).unwrap();
            assert!(goblin.walk_queue.is_empty());
            assert_eq!(goblin.position(), Vec3::new(6.0, 6.0, 0.0));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (outbox, _inbox) = Outbox::connected();
        let config = SimulationConfig {
            dig_candidate_cap: 0,
            ..Default::default()
        };
        assert!(Simulation::new(config, TileMap::new(), ClassCatalog::new(), outbox).is_err());
    }
}
