//! Database configuration via `gdbkit.toml`
//!
//! A configuration document lists every database the process may use and
//! names the default one:
//!
//! ```toml
//! [databases]
//! default = "foo1"
//!
//! [[databases.database]]
//! name = "foo0"
//! alias = "FOO0"
//! path = "gdb0.dex"
//!
//! [[databases.database]]
//! name = "foo1"
//! alias = "FOO1"
//! path = "gdb1.dex"
//! conf = "gdb1.cfg"
//! ```
//!
//! `name`, `alias` and `path` are required and must be non-empty. `conf`
//! names an engine tuning file and is passed through untouched. Unknown keys
//! are rejected. The loader only populates; validation of the finished tree
//! (non-empty, default present) happens on activation.

use std::path::{Path, PathBuf};

use gdbkit_core::{ConfigurationLoader, ConfigurationTree, DatabaseDescriptor, Error, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    databases: Option<RawDatabases>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDatabases {
    default: Option<String>,
    #[serde(default)]
    database: Vec<RawDatabase>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDatabase {
    name: Option<String>,
    alias: Option<String>,
    path: Option<String>,
    conf: Option<String>,
}

impl RawDatabase {
    fn required<'a>(value: &'a Option<String>, field: &str, index: usize) -> Result<&'a str> {
        match value.as_deref() {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(Error::configuration(format!(
                "Database entry #{} is missing required field '{}'",
                index + 1,
                field
            ))),
        }
    }

    fn into_descriptor(self, index: usize) -> Result<DatabaseDescriptor> {
        let name = Self::required(&self.name, "name", index)?;
        let alias = Self::required(&self.alias, "alias", index)?;
        let path = Self::required(&self.path, "path", index)?;
        let mut descriptor = DatabaseDescriptor::new(name, alias, path);
        if let Some(conf) = self.conf.filter(|c| !c.is_empty()) {
            descriptor = descriptor.with_tuning(conf);
        }
        Ok(descriptor)
    }
}

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Text(String),
}

/// [`ConfigurationLoader`] reading the TOML document format.
#[derive(Debug, Clone)]
pub struct TomlConfigLoader {
    origin: Origin,
}

impl TomlConfigLoader {
    /// Loader reading the document at `path` when populating.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        TomlConfigLoader {
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }

    /// Loader over an in-memory document.
    pub fn from_toml(text: impl Into<String>) -> Self {
        TomlConfigLoader {
            origin: Origin::Text(text.into()),
        }
    }

    fn read(&self) -> Result<String> {
        match &self.origin {
            Origin::File(path) => std::fs::read_to_string(path).map_err(|e| {
                Error::configuration(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }),
            Origin::Text(text) => Ok(text.clone()),
        }
    }
}

impl ConfigurationLoader for TomlConfigLoader {
    fn source(&self) -> String {
        match &self.origin {
            Origin::File(path) => format!("file:{}", path.display()),
            Origin::Text(_) => "inline".to_string(),
        }
    }

    fn populate(&self, tree: &mut ConfigurationTree) -> Result<()> {
        let text = self.read()?;
        let document: RawDocument = toml::from_str(&text).map_err(|e| {
            Error::configuration(format!("Failed to parse {}: {}", self.source(), e))
        })?;

        let databases = match document.databases {
            Some(databases) => databases,
            None => return Ok(()),
        };
        for (index, raw) in databases.database.into_iter().enumerate() {
            tree.add_descriptor(raw.into_descriptor(index)?)?;
        }
        if let Some(default) = databases.default {
            tree.set_default(default);
        }

        debug!(
            target: "gdbkit::config",
            source = %self.source(),
            databases = tree.len(),
            default = ?tree.default_name(),
            "Configuration populated"
        );
        Ok(())
    }
}
