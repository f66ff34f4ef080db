//! Simulation configuration with documented constants
//!
//! All tuning numbers for creature cognition are collected here with
//! explanations of their purpose and how they interact with each other.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the simulation systems
///
/// Passed explicitly through the simulation context; there is no global
/// accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === IDLE DECISIONS ===
    /// Probability that an idle creature goes looking for tiles to dig
    ///
    /// Only applies to creatures whose dig rate exceeds `min_dig_rate`.
    pub dig_probability: f64,

    /// Cumulative probability threshold for wandering
    ///
    /// A roll in `[dig_probability, wander_probability)` makes the
    /// creature wander; anything above stays idle. At the defaults
    /// (0.4, 0.6) a digger wanders 20% of its idle decisions and stands
    /// still the remaining 40%.
    pub wander_probability: f64,

    /// Creatures with a dig rate at or below this never choose to dig
    pub min_dig_rate: f64,

    /// Standard deviation of the wander offset, in tiles
    pub wander_sigma: f64,

    // === DIG TARGETING ===
    /// Maximum number of candidate paths kept while choosing a dig target
    ///
    /// When a new candidate would exceed the cap the longest one is
    /// evicted. This keeps per-tick cost bounded at the price of an
    /// approximate shortest-path choice.
    pub dig_candidate_cap: usize,

    // === MOVEMENT ===
    /// Distance under which a walking creature counts as arrived
    pub arrival_epsilon: f64,

    // === LOOP ===
    /// Simulation ticks per second for the threaded runner
    pub tick_rate_hz: u32,

    /// Seed for the deterministic simulation RNG
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dig_probability: 0.4,
            wander_probability: 0.6,
            min_dig_rate: 0.1,
            wander_sigma: 2.0,
            dig_candidate_cap: 6,
            arrival_epsilon: 0.01,
            tick_rate_hz: 10,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(self.dig_probability) || !in_unit(self.wander_probability) {
            return Err(SimError::Config(
                "decision probabilities must lie in [0, 1]".into(),
            ));
        }

        // Thresholds are cumulative
        if self.dig_probability > self.wander_probability {
            return Err(SimError::Config(format!(
                "dig_probability ({}) should be <= wander_probability ({})",
                self.dig_probability, self.wander_probability
            )));
        }

        if self.dig_candidate_cap == 0 {
            return Err(SimError::Config("dig_candidate_cap must be at least 1".into()));
        }

        if self.wander_sigma <= 0.0 || self.arrival_epsilon <= 0.0 {
            return Err(SimError::Config(
                "wander_sigma and arrival_epsilon must be positive".into(),
            ));
        }

        if self.tick_rate_hz == 0 {
            return Err(SimError::Config("tick_rate_hz must be positive".into()));
        }

        Ok(())
    }
}
