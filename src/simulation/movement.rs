//! Movement integration - walks creatures along their waypoint queues
//!
//! Runs after cognition each tick. It only ever pops waypoints; it never
//! touches the action stack, so an emptied queue is noticed by the
//! creature's next WalkToTile dispatch.

use crate::entity::creature::Creature;
use crate::mailbox::Outbox;
use crate::world::map::TileMap;

/// Advance `creature` toward its front waypoint by `move_speed * dt`
///
/// Arriving snaps the creature onto the waypoint, pops it and turns the
/// creature toward the next one. Leftover step length is not carried over.
pub fn integrate(
    creature: &mut Creature,
    map: &mut TileMap,
    outbox: &Outbox,
    dt: f64,
    arrival_epsilon: f64,
) {
    let Some(destination) = creature.walk_queue.front() else {
        return;
    };

    let position = creature.position();
    let to_go = destination - position;
    let distance = to_go.length();
    let step = creature.move_speed * dt;

    if step + arrival_epsilon >= distance {
        creature.set_position(destination, map, outbox);
        creature.walk_queue.pop_front();
        if let Some(next) = creature.walk_queue.front() {
            creature.face_toward(next, outbox);
        }
    } else {
        creature.set_position(position + to_go.normalize() * step, map, outbox);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CreatureId, TileCoord, Vec3};
    use crate::entity::class::ClassCatalog;

    fn walker(map: &mut TileMap) -> Creature {
        let catalog = ClassCatalog::with_defaults();
        let creature = Creature::from_class(
            CreatureId(9),
            "Walker".into(),
            catalog.get("Kobold").unwrap(),
            Vec3::new(0.0, 0.0, 0.0),
        );
        creature.place_on_map(map);
        creature
    }

    #[test]
    fn test_partial_step() {
        let mut map = TileMap::open(5, 5);
        let (outbox, _inbox) = Outbox::connected();
        let mut creature = walker(&mut map);
        creature.add_destination(TileCoord::new(2, 0), &outbox);

        integrate(&mut creature, &mut map, &outbox, 0.5, 0.01);
        assert!((creature.position().x - 0.5).abs() < 1e-9);
        assert_eq!(creature.walk_queue.len(), 1);
    }

    #[test]
    fn test_arrival_pops_and_moves_occupancy() {
        let mut map = TileMap::open(5, 5);
        let (outbox, _inbox) = Outbox::connected();
        let mut creature = walker(&mut map);
        creature.add_destination(TileCoord::new(1, 0), &outbox);
        creature.add_destination(TileCoord::new(1, 1), &outbox);

        integrate(&mut creature, &mut map, &outbox, 1.0, 0.01);
        assert_eq!(creature.position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(creature.walk_queue.len(), 1);
        assert_eq!(creature.walk_direction, Vec3::new(0.0, 1.0, 0.0));
        assert!(map.get_tile(TileCoord::new(0, 0)).unwrap().creatures().is_empty());
        assert_eq!(map.get_tile(TileCoord::new(1, 0)).unwrap().creatures(), &[CreatureId(9)]);
    }

    #[test]
    fn test_empty_queue_does_nothing() {
        let mut map = TileMap::open(2, 2);
        let (outbox, inbox) = Outbox::connected();
        let mut creature = walker(&mut map);
        integrate(&mut creature, &mut map, &outbox, 1.0, 0.01);
        assert_eq!(creature.position(), Vec3::default());
        assert!(inbox.render.drain_all().is_empty());
    }
}
