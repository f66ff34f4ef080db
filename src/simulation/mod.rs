pub mod cognition;
pub mod movement;
pub mod tick;
pub mod visibility;

pub use cognition::{advance, CognitionContext};
pub use movement::integrate;
pub use tick::Simulation;
pub use visibility::visible_tiles;
