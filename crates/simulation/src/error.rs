//! Error types for configuration and construction.
//!
//! Grid and simulation operations are total; only building a simulation from
//! a configuration can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("simulation area must be non-empty, got {width}x{height}")]
    ZeroArea { width: usize, height: usize },

    #[error("cell size must be at least 1")]
    ZeroCellSize,

    #[error("cell size {cell_size} does not fit in a {width}x{height} area")]
    CellLargerThanArea {
        cell_size: usize,
        width: usize,
        height: usize,
    },

    #[error("drain duration must be finite, got {0}")]
    NonFiniteDrainDuration(f32),

    #[error("drain duration must be positive, got {0}s")]
    NonPositiveDrainDuration(f32),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
