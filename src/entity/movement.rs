//! Movement queue - waypoints a creature is walking toward

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementQueue {
    waypoints: VecDeque<Vec3>,
}

impl MovementQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, waypoint: Vec3) {
        self.waypoints.push_back(waypoint);
    }

    pub fn front(&self) -> Option<Vec3> {
        self.waypoints.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<Vec3> {
        self.waypoints.pop_front()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        self.waypoints.iter()
    }
}
