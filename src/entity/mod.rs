pub mod actions;
pub mod class;
pub mod creature;
pub mod movement;

pub use actions::{ActionKind, ActionStack};
pub use class::{ClassCatalog, CreatureClass, CreatureSpec};
pub use creature::Creature;
pub use movement::MovementQueue;
