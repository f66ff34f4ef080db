//! Commands handed from the simulation thread to the render and network
//! threads

use serde::{Deserialize, Serialize};

use crate::core::types::{CreatureId, TileCoord, Vec3};

/// Work item for the render thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderRequest {
    /// Load the creature's mesh and attach it to a scene node
    CreateMesh {
        creature: CreatureId,
        name: String,
        mesh: String,
        position: Vec3,
        scale: Vec3,
    },
    /// Detach and free the creature's mesh
    DestroyMesh { creature: CreatureId, name: String },
    /// Forget the creature entirely; always follows `DestroyMesh`
    DeleteCreature { creature: CreatureId },
    SetAnimationState { creature: CreatureId, state: String },
    SetCreaturePosition { creature: CreatureId, position: Vec3 },
    /// Turn the creature's scene node to face along `facing`
    OrientCreature { creature: CreatureId, facing: Vec3 },
    /// Re-pick the tile mesh after a fullness change
    RefreshTile { coord: TileCoord },
}

/// Message the network thread broadcasts to connected clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerNotification {
    SetAnimationState { creature_name: String, state: String },
    AddDestination { creature_name: String, destination: Vec3 },
}
