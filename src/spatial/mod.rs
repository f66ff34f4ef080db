pub mod pathfinding;

pub use pathfinding::{cut_corners, GridPlanner, PathPlanner};
