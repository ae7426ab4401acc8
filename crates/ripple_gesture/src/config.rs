//! Gesture timing and distance presets.

use serde::{Deserialize, Serialize};

use crate::error::{GestureError, Result};

/// Largest finger count any recognizer accepts.
pub const MAX_FINGERS: usize = 10;

/// Thresholds shared by all recognizers built from one context.
///
/// Distances suffixed `_vp` are virtual pixels and are multiplied by
/// `density` before being compared against event coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Physical pixels per virtual pixel.
    pub density: f32,
    /// How long a multi-finger click waits for the remaining fingers (ms).
    pub multi_finger_timeout_ms: u64,
    /// How long a multi-tap click waits for the next tap (ms).
    pub multi_tap_timeout_ms: u64,
    /// Maximum distance between consecutive taps of a multi-tap (px).
    pub multi_tap_slop: f32,
    /// Default long-press duration (ms).
    pub long_press_duration_ms: u64,
    /// Movement that cancels a long press before it fires (px).
    pub long_press_move_threshold: f32,
    /// Default pinch distance (vp).
    pub pinch_distance_vp: f32,
    /// Default pan distance (vp).
    pub pan_distance_vp: f32,
    /// Scale change applied per ctrl+wheel tick.
    pub axis_pinch_step: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GestureConfig {
    /// Standard thresholds for touch screens.
    pub fn standard() -> Self {
        Self {
            density: 1.0,
            multi_finger_timeout_ms: 300,
            multi_tap_timeout_ms: 300,
            multi_tap_slop: 100.0,
            long_press_duration_ms: 500,
            long_press_move_threshold: 15.0,
            pinch_distance_vp: 5.0,
            pan_distance_vp: 5.0,
            axis_pinch_step: 0.1,
        }
    }

    /// Same thresholds with density pinned to 1 so test coordinates are exact.
    pub fn testing() -> Self {
        Self::standard().with_density(1.0)
    }

    /// Set the display density.
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Set the default long-press duration.
    pub fn with_long_press_duration(mut self, millis: u64) -> Self {
        self.long_press_duration_ms = millis;
        self
    }

    /// Set the multi-tap timeout.
    pub fn with_multi_tap_timeout(mut self, millis: u64) -> Self {
        self.multi_tap_timeout_ms = millis;
        self
    }

    /// Pinch distance converted to pixels.
    pub fn pinch_distance_px(&self) -> f32 {
        self.pinch_distance_vp * self.density
    }

    /// Pan distance converted to pixels.
    pub fn pan_distance_px(&self) -> f32 {
        self.pan_distance_vp * self.density
    }

    /// Check every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        if self.density <= 0.0 {
            return Err(GestureError::InvalidDistance("density", self.density));
        }
        if self.multi_finger_timeout_ms == 0 {
            return Err(GestureError::InvalidDuration("multi_finger_timeout_ms"));
        }
        if self.multi_tap_timeout_ms == 0 {
            return Err(GestureError::InvalidDuration("multi_tap_timeout_ms"));
        }
        if self.long_press_duration_ms == 0 {
            return Err(GestureError::InvalidDuration("long_press_duration_ms"));
        }
        for (name, value) in [
            ("multi_tap_slop", self.multi_tap_slop),
            ("long_press_move_threshold", self.long_press_move_threshold),
            ("pinch_distance_vp", self.pinch_distance_vp),
            ("pan_distance_vp", self.pan_distance_vp),
            ("axis_pinch_step", self.axis_pinch_step),
        ] {
            if value <= 0.0 {
                return Err(GestureError::InvalidDistance(name, value));
            }
        }
        Ok(())
    }
}

/// Check a recognizer finger count.
pub fn validate_fingers(fingers: usize) -> Result<usize> {
    if fingers == 0 || fingers > MAX_FINGERS {
        return Err(GestureError::InvalidFingers(fingers));
    }
    Ok(fingers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_is_valid() {
        assert!(GestureConfig::standard().validate().is_ok());
        assert!(GestureConfig::testing().validate().is_ok());
    }

    #[test]
    fn test_density_scales_distances() {
        let config = GestureConfig::standard().with_density(2.0);
        assert_eq!(config.pinch_distance_px(), 10.0);
        assert_eq!(config.pan_distance_px(), 10.0);
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let config = GestureConfig::standard().with_long_press_duration(0);
        assert_eq!(
            config.validate(),
            Err(GestureError::InvalidDuration("long_press_duration_ms"))
        );
    }

    #[test]
    fn test_validate_fingers() {
        assert_eq!(validate_fingers(1), Ok(1));
        assert_eq!(validate_fingers(10), Ok(10));
        assert_eq!(validate_fingers(0), Err(GestureError::InvalidFingers(0)));
        assert_eq!(validate_fingers(11), Err(GestureError::InvalidFingers(11)));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GestureConfig = toml::from_str("long_press_duration_ms = 800\n").unwrap();
        assert_eq!(config.long_press_duration_ms, 800);
        assert_eq!(config.multi_tap_timeout_ms, 300);
    }
}
