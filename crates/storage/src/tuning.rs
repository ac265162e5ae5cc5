//! Engine tuning file
//!
//! A database descriptor may carry a tuning reference (`conf` in the
//! configuration source). The lifecycle layer never reads it; the file engine
//! parses it as TOML when the database is opened.
//!
//! # Example
//!
//! ```toml
//! [storage]
//! # fsync the catalog and its directory on every schema change (default: true)
//! sync_writes = true
//! # reject schema changes (default: false)
//! read_only = false
//! ```

use gdbkit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed tuning file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageTuning {
    /// `[storage]` section
    #[serde(default)]
    pub storage: StorageSection,
}

/// `[storage]` section of a tuning file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// fsync catalog writes.
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
    /// Reject schema changes.
    #[serde(default)]
    pub read_only: bool,
}

fn default_sync_writes() -> bool {
    true
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            sync_writes: default_sync_writes(),
            read_only: false,
        }
    }
}

impl StorageTuning {
    /// Parse tuning from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not valid tuning TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse tuning file: {}", e)))
    }

    /// Read and parse a tuning file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read tuning file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse tuning file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Tuning for an optional reference; defaults when absent.
    pub fn resolve(reference: Option<&Path>) -> Result<Self> {
        match reference {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
