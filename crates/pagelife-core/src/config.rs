#![forbid(unsafe_code)]

//! Tracker and listener configuration.

use core::fmt;

use serde::Deserialize;

use crate::event::EventKind;

/// Options controlling how a tracker attaches to its host.
///
/// Deserializes from a JSON object with camelCase keys; missing keys fall
/// back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TrackerConfig {
    /// Register listeners in the capture phase so application handlers that
    /// stop propagation cannot hide lifecycle signals.
    /// Default: true
    pub capture: bool,

    /// Also listen to the legacy `unload` event.
    /// Default: false
    pub listen_unload: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capture: true,
            listen_unload: false,
        }
    }
}

impl TrackerConfig {
    /// Set [`capture`](Self::capture).
    #[must_use]
    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Set [`listen_unload`](Self::listen_unload).
    #[must_use]
    pub fn with_unload(mut self, listen_unload: bool) -> Self {
        self.listen_unload = listen_unload;
        self
    }

    /// Parse options from a JSON object string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Event kinds a listener set built from this config registers.
    #[must_use]
    pub fn event_kinds(&self) -> Vec<EventKind> {
        let mut kinds = EventKind::LIFECYCLE.to_vec();
        if self.listen_unload {
            kinds.push(EventKind::Unload);
        }
        kinds
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    /// Options JSON did not match the expected schema.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid tracker options: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}
