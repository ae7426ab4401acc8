//! Event manager configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use ripple_gesture::GestureConfig;

use crate::error::Result;

/// First API version using the hover dispatch cursor and cached mouse tests
pub const API_VERSION_HOVER_CURSOR: u32 = 12;
/// First API version keeping an independent press chain per mouse button
pub const API_VERSION_BUTTON_CHAINS: u32 = 13;

/// Settings for one [`EventManager`](crate::EventManager)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventManagerConfig {
    /// Target platform API version; gates the versioned mouse and hover paths
    pub api_version: u32,
    /// Idle gap after which an unresolved referee is considered stuck (ms)
    pub event_clear_duration_ms: u64,
    /// Most lines emitted per event tree dump
    pub dump_limit: usize,
    /// Request a frame after resampled move batches
    pub enable_resample: bool,
    /// Thresholds for recognizers created on this manager's context
    pub gesture: GestureConfig,
}

impl Default for EventManagerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl EventManagerConfig {
    pub fn standard() -> Self {
        Self {
            api_version: API_VERSION_BUTTON_CHAINS,
            event_clear_duration_ms: 1000,
            dump_limit: 500,
            enable_resample: true,
            gesture: GestureConfig::standard(),
        }
    }

    /// Behaviour of hosts built against API 11
    pub fn legacy() -> Self {
        Self {
            api_version: 11,
            ..Self::standard()
        }
    }

    /// Unbounded dumps and exact test coordinates
    pub fn debug() -> Self {
        Self {
            dump_limit: usize::MAX,
            gesture: GestureConfig::testing(),
            ..Self::standard()
        }
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_event_clear_duration(mut self, millis: u64) -> Self {
        self.event_clear_duration_ms = millis;
        self
    }

    pub fn with_dump_limit(mut self, dump_limit: usize) -> Self {
        self.dump_limit = dump_limit;
        self
    }

    pub fn with_resample(mut self, enable: bool) -> Self {
        self.enable_resample = enable;
        self
    }

    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn uses_hover_cursor(&self) -> bool {
        self.api_version >= API_VERSION_HOVER_CURSOR
    }

    pub fn uses_button_chains(&self) -> bool {
        self.api_version >= API_VERSION_BUTTON_CHAINS
    }

    /// Parse and validate a TOML document. Missing keys keep their
    /// standard values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.gesture.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_presets() {
        assert!(EventManagerConfig::standard().uses_button_chains());
        let legacy = EventManagerConfig::legacy();
        assert!(!legacy.uses_hover_cursor());
        assert!(!legacy.uses_button_chains());
        assert_eq!(legacy.event_clear_duration_ms, 1000);
        assert_eq!(EventManagerConfig::debug().dump_limit, usize::MAX);
    }

    #[test]
    fn test_from_toml_nested_gesture() {
        let config = EventManagerConfig::from_toml_str(
            "api_version = 12\n\n[gesture]\nlong_press_duration_ms = 800\n",
        )
        .unwrap();
        assert_eq!(config.api_version, 12);
        assert!(config.uses_hover_cursor());
        assert!(!config.uses_button_chains());
        assert_eq!(config.gesture.long_press_duration_ms, 800);
        assert_eq!(config.dump_limit, 500);
    }

    #[test]
    fn test_from_toml_rejects_invalid_gesture() {
        let err = EventManagerConfig::from_toml_str("[gesture]\npinch_distance_vp = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_toml_parse_error() {
        let err = EventManagerConfig::from_toml_str("api_version = \"twelve\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EventManagerConfig::load("/nonexistent/ripple-events.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
