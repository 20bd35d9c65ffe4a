//! Persistence configuration

use crate::error::{Result, StateError};
use serde::{Deserialize, Serialize};

/// Controls how state documents are written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistConfig {
    /// Pretty-print the JSON encoding
    pub pretty: bool,

    /// Write to a temp file and rename it over the target
    pub atomic: bool,

    /// Extension of the temp file used for atomic writes
    pub temp_extension: String,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            atomic: true,
            temp_extension: "tmp".to_string(),
        }
    }
}

impl PersistConfig {
    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.atomic && self.temp_extension.trim().is_empty() {
            return Err(StateError::Config(
                "Temp extension cannot be empty for atomic writes".to_string(),
            ));
        }
        if self.temp_extension.contains(['/', '\\']) {
            return Err(StateError::Config(format!(
                "Temp extension '{}' must not contain path separators",
                self.temp_extension
            )));
        }
        Ok(())
    }
}
