//! Error types for ripple_events

use thiserror::Error;

use ripple_gesture::GestureError;

/// Errors raised while loading event manager configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Config read failed: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Config parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    /// The embedded gesture thresholds are unusable
    #[error("Invalid gesture config: {0}")]
    Invalid(#[from] GestureError),
}

/// Result type for ripple_events setup operations
pub type Result<T> = std::result::Result<T, ConfigError>;
