//! Error type shared by the simulation core, configuration and checkpoints.

use thiserror::Error;

/// Errors surfaced by construction, configuration and persistence.
///
/// Nothing inside a tick returns an error: out-of-range gene indices wrap,
/// blocked moves are dropped and empty generations are repopulated.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value cannot produce a valid world.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown sensor: {0}")]
    UnknownSensor(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
