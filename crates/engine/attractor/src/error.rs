//! Error types for the attractor crate

use thiserror::Error;

/// Result type alias for attractor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running an engine
#[derive(Debug, Error)]
pub enum Error {
    /// More points requested than the engine's buffer holds
    #[error("Capacity exceeded: requested {requested} points, buffer holds {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// Point buffer for this many points does not fit in memory
    #[error("Point buffer too large: {0} points")]
    BufferTooLarge(usize),

    /// Side-flip variation code outside 0..=2
    #[error("Invalid side-flip variation code: {0}")]
    InvalidVariation(u8),

    /// Config file could not be read
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}
