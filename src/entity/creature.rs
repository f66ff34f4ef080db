//! Creatures - the dungeon's autonomous inhabitants
//!
//! A creature exclusively owns its action stack and movement queue. Only
//! the simulation thread mutates them; everything the renderer or the
//! network needs to know leaves through the [`Outbox`].

use std::fmt;

use crate::core::types::{CreatureId, TileCoord, Vec3};
use crate::entity::actions::ActionStack;
use crate::entity::class::{CreatureClass, CreatureSpec};
use crate::entity::movement::MovementQueue;
use crate::mailbox::{Outbox, RenderRequest, ServerNotification};
use crate::world::map::TileMap;
use crate::world::tile::Passability;

#[derive(Debug, Clone)]
pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    pub class_name: String,
    pub mesh_name: String,
    pub color: i32,
    pub scale: Vec3,
    position: Vec3,

    pub hp: i32,
    pub mana: i32,
    pub sight_radius: f64,
    pub dig_rate: f64,
    pub move_speed: f64,
    pub passability: Passability,

    pub actions: ActionStack,
    pub walk_queue: MovementQueue,
    /// Unit vector toward the waypoint being walked to
    pub walk_direction: Vec3,
    animation_state: Option<String>,
}

impl Creature {
    /// Stamp a creature out of its class template
    pub fn from_class(id: CreatureId, name: String, class: &CreatureClass, position: Vec3) -> Self {
        Self {
            id,
            name,
            class_name: class.class_name.clone(),
            mesh_name: class.mesh_name.clone(),
            color: 0,
            scale: class.scale,
            position,
            hp: class.hp,
            mana: class.mana,
            sight_radius: class.sight_radius,
            dig_rate: class.dig_rate,
            move_speed: class.move_speed,
            passability: class.passability,
            actions: ActionStack::new(),
            walk_queue: MovementQueue::new(),
            walk_direction: Vec3::default(),
            animation_state: None,
        }
    }

    pub fn from_spec(id: CreatureId, spec: CreatureSpec, class: &CreatureClass) -> Self {
        let mut creature = Self::from_class(id, spec.name, class, spec.position);
        creature.color = spec.color;
        creature
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The tile this creature is standing in (truncated position)
    pub fn tile(&self) -> TileCoord {
        self.position.tile()
    }

    /// Record this creature in its current tile's occupant list
    pub fn place_on_map(&self, map: &mut TileMap) {
        map.add_creature(self.tile(), self.id);
    }

    /// Move to `position`, keeping tile occupancy in step
    ///
    /// Occupancy only changes when the truncated tile changes.
    pub fn set_position(&mut self, position: Vec3, map: &mut TileMap, outbox: &Outbox) {
        let old_tile = self.tile();
        self.position = position;
        let new_tile = self.tile();

        if old_tile != new_tile {
            map.remove_creature(old_tile, self.id);
            map.add_creature(new_tile, self.id);
        }

        outbox.render(RenderRequest::SetCreaturePosition {
            creature: self.id,
            position,
        });
    }

    /// Queue a waypoint; starting from an empty queue also sets the facing
    ///
    /// Every call produces exactly one `AddDestination` notification.
    pub fn add_destination(&mut self, tile: TileCoord, outbox: &Outbox) {
        let destination = tile.to_position();
        tracing::trace!(creature = %self.name, destination = %tile, "add destination");

        if self.walk_queue.is_empty() {
            self.walk_queue.push_back(destination);
            self.face_toward(destination, outbox);
        } else {
            self.walk_queue.push_back(destination);
        }

        outbox.notify(ServerNotification::AddDestination {
            creature_name: self.name.clone(),
            destination,
        });
    }

    /// Turn toward `target` and tell the renderer
    pub fn face_toward(&mut self, target: Vec3, outbox: &Outbox) {
        self.walk_direction = (target - self.position).normalize();
        outbox.render(RenderRequest::OrientCreature {
            creature: self.id,
            facing: self.walk_direction,
        });
    }

    pub fn animation_state(&self) -> Option<&str> {
        self.animation_state.as_deref()
    }

    /// Switch animation; repeating the current state sends nothing
    pub fn set_animation_state(&mut self, state: &str, outbox: &Outbox) {
        if self.animation_state.as_deref() == Some(state) {
            return;
        }
        self.animation_state = Some(state.to_string());

        outbox.notify(ServerNotification::SetAnimationState {
            creature_name: self.name.clone(),
            state: state.to_string(),
        });
        outbox.render(RenderRequest::SetAnimationState {
            creature: self.id,
            state: state.to_string(),
        });
    }

    pub fn create_mesh(&self, outbox: &Outbox) {
        outbox.render(RenderRequest::CreateMesh {
            creature: self.id,
            name: self.name.clone(),
            mesh: self.mesh_name.clone(),
            position: self.position,
            scale: self.scale,
        });
    }

    fn destroy_mesh_request(&self) -> RenderRequest {
        RenderRequest::DestroyMesh {
            creature: self.id,
            name: self.name.clone(),
        }
    }

    /// Tear the creature down: leave the map, then destroy and delete
    ///
    /// Consumes the creature; the render thread receives the two requests
    /// back to back.
    pub fn delete(self, map: &mut TileMap, outbox: &Outbox) {
        map.remove_creature(self.tile(), self.id);
        outbox.render.push_all([
            self.destroy_mesh_request(),
            RenderRequest::DeleteCreature { creature: self.id },
        ]);
    }
}

/// Level-file line: `class\tname\tx\ty\tz\tcolor`
impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.class_name, self.name, self.position.x, self.position.y, self.position.z, self.color
        )
    }
}
