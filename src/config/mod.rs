//! Configuration loading and management
//!
//! The configuration is a flat `options` map of string keys to string values,
//! stored as TOML. Typed accessors resolve the values the engine needs and
//! fall back to the documented defaults when a key is absent or malformed.

mod io;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Option key for the level threshold table
pub const THRESHOLDS_KEY: &str = "thresholds";

/// Option key for the event log ceiling
pub const EVENTS_MAX_KEY: &str = "events.max";

/// Built-in level table, used when `thresholds` is absent or malformed
pub const DEFAULT_THRESHOLDS: &str = "0:ZERO,5:BLUE,20:GREY,40:RED,75:BLACK";

/// Event log ceiling used when `events.max` is absent or malformed
pub const DEFAULT_EVENTS_MAX: usize = 1_000_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Flat key-value options
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl Config {
    /// Create a config holding every documented default
    pub fn with_defaults() -> Self {
        let mut config = Self::default();
        config
            .options
            .insert(THRESHOLDS_KEY.to_string(), DEFAULT_THRESHOLDS.to_string());
        config
            .options
            .insert(EVENTS_MAX_KEY.to_string(), DEFAULT_EVENTS_MAX.to_string());
        config
    }

    /// Builder-style option setter
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Raw option value
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Threshold table string, if configured and not blank
    pub fn thresholds(&self) -> Option<&str> {
        self.option(THRESHOLDS_KEY).filter(|s| !s.trim().is_empty())
    }

    /// Effective event log ceiling
    ///
    /// Only a positive integer is accepted; anything else means the default.
    pub fn events_max(&self) -> usize {
        match self.option(EVENTS_MAX_KEY).map(|raw| raw.trim().parse::<usize>()) {
            Some(Ok(max)) if max > 0 => max,
            Some(_) => {
                tracing::warn!(
                    "Ignoring invalid {} value, using {}",
                    EVENTS_MAX_KEY,
                    DEFAULT_EVENTS_MAX
                );
                DEFAULT_EVENTS_MAX
            }
            None => DEFAULT_EVENTS_MAX,
        }
    }
}
