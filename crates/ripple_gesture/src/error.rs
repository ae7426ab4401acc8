//! Gesture configuration errors

use thiserror::Error;

/// Errors raised while building recognizers or validating gesture config
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    /// Finger count outside the supported range
    #[error("Invalid finger count: {0} (expected 1..=10)")]
    InvalidFingers(usize),

    /// Tap count must be at least one
    #[error("Invalid tap count: {0}")]
    InvalidCount(u32),

    /// Durations must be non-zero
    #[error("Invalid duration for {0}: must be greater than zero")]
    InvalidDuration(&'static str),

    /// Distances must be positive
    #[error("Invalid distance for {0}: {1}")]
    InvalidDistance(&'static str, f32),
}

/// Result type for gesture setup operations
pub type Result<T> = std::result::Result<T, GestureError>;
