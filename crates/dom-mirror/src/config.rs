//! Session configuration, read from TOML.
//!
//! ```toml
//! mode = "patch"            # or "snapshot"
//! on_unreachable = "skip"   # or "fail"
//! sibling_fallback = false
//! snapshot_debounce_ms = 0
//! send_initial_snapshot = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// One patch per mutating call.
    #[default]
    Patch,
    /// The whole document markup after each mutating call, coalesced.
    Snapshot,
}

/// What capture does when a mutation cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnreachablePolicy {
    /// Record the error and keep capturing.
    #[default]
    Skip,
    /// Record the error and stop emitting for the rest of the session.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub mode: CaptureMode,
    #[serde(default)]
    pub on_unreachable: UnreachablePolicy,
    #[serde(default)]
    pub sibling_fallback: bool,
    #[serde(default)]
    pub snapshot_debounce_ms: u64,
    #[serde(default = "default_send_initial_snapshot")]
    pub send_initial_snapshot: bool,
}

const fn default_send_initial_snapshot() -> bool {
    true
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            mode: CaptureMode::default(),
            on_unreachable: UnreachablePolicy::default(),
            sibling_fallback: false,
            snapshot_debounce_ms: 0,
            send_initial_snapshot: default_send_initial_snapshot(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config encode failed: {0}")]
    Encode(#[from] toml::ser::Error),
}

impl MirrorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(error) => return Err(error.into()),
        };
        Self::from_toml_str(&raw)
    }
}
