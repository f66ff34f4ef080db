use thiserror::Error;

use crate::core::types::CreatureId;

#[derive(Error, Debug)]
pub enum SimError {
    /// The Idle sentinel went missing. Always a programming error.
    #[error("Creature {creature} has an empty action stack")]
    EmptyActionStack { creature: CreatureId },

    #[error("Creature not found: {0}")]
    CreatureNotFound(CreatureId),

    #[error("Unknown creature class: {0}")]
    UnknownCreatureClass(String),

    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
