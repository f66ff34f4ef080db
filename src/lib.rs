//! Deepkeep - creature cognition for a real-time dungeon strategy game
//!
//! The simulation thread decides what every creature does each tick and
//! hands the resulting work to the render and network threads through
//! single-producer mailboxes.

pub mod core;
pub mod entity;
pub mod mailbox;
pub mod simulation;
pub mod spatial;
pub mod world;
