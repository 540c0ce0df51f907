//! Sync layer configuration.
//!
//! Loaded from an optional TOML file; every field has a default so an
//! absent or partial file is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Tunables for the synchronization controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// Quiet period after the last mutation before a push fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Upper bound on the initial remote read at session start.
    #[serde(default = "default_hydrate_timeout_ms")]
    pub hydrate_timeout_ms: u64,

    /// Key under which the record is cached locally.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_debounce_ms() -> u64 {
    400
}

fn default_hydrate_timeout_ms() -> u64 {
    4000
}

fn default_namespace() -> String {
    "praxis-progress".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            hydrate_timeout_ms: default_hydrate_timeout_ms(),
            namespace: default_namespace(),
        }
    }
}

impl SyncConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| SyncError::ConfigParse(e.to_string()))
    }

    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }

    pub fn hydrate_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.hydrate_timeout_ms)
    }
}
