//! Declarative database configuration
//!
//! A [`ConfigurationTree`] is built in two phases: a loader (or the caller)
//! adds descriptors and names the default, then [`ConfigurationTree::validate`]
//! checks every structural invariant once, at the end. Nothing is validated
//! while the tree is being populated except name uniqueness.
//!
//! Once a tree has been activated it is shared behind an `Arc` and never
//! edited again; switching configuration means activating a different tree.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Named configuration of a single database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDescriptor {
    name: String,
    alias: String,
    path: PathBuf,
    tuning: Option<PathBuf>,
}

impl DatabaseDescriptor {
    /// Create a descriptor without a tuning reference.
    pub fn new(name: impl Into<String>, alias: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DatabaseDescriptor {
            name: name.into(),
            alias: alias.into(),
            path: path.into(),
            tuning: None,
        }
    }

    /// Attach an engine tuning reference, passed through to the storage engine.
    pub fn with_tuning(mut self, tuning: impl Into<PathBuf>) -> Self {
        self.tuning = Some(tuning.into());
        self
    }

    /// Unique name of the database within its tree.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Location of the storage file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Optional engine tuning reference.
    pub fn tuning(&self) -> Option<&Path> {
        self.tuning.as_deref()
    }

    fn check_required(&self) -> Result<()> {
        if self.name.is_empty() || self.alias.is_empty() || self.path.as_os_str().is_empty() {
            return Err(Error::configuration(format!(
                "'name', 'alias' and 'path' are required for database '{}'",
                self.name
            )));
        }
        Ok(())
    }
}

/// Set of database descriptors with one designated default.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationTree {
    databases: Vec<DatabaseDescriptor>,
    default: Option<String>,
}

impl ConfigurationTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree holding a single descriptor, which is also the default.
    pub fn single(descriptor: DatabaseDescriptor) -> Self {
        ConfigurationTree {
            default: Some(descriptor.name.clone()),
            databases: vec![descriptor],
        }
    }

    /// Add a descriptor.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a descriptor with the same name exists.
    pub fn add_descriptor(&mut self, descriptor: DatabaseDescriptor) -> Result<()> {
        if self.get(descriptor.name()).is_some() {
            return Err(Error::configuration(format!(
                "Duplicate database name '{}'",
                descriptor.name()
            )));
        }
        self.databases.push(descriptor);
        Ok(())
    }

    /// Name the default database. The descriptor may be added afterwards.
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default = Some(name.into());
    }

    /// Name of the default database, if one was set.
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The default descriptor, if it is set and present.
    pub fn default_descriptor(&self) -> Option<&DatabaseDescriptor> {
        self.default.as_deref().and_then(|name| self.get(name))
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&DatabaseDescriptor> {
        self.databases.iter().find(|d| d.name() == name)
    }

    /// All descriptors, in insertion order.
    pub fn descriptors(&self) -> &[DatabaseDescriptor] {
        &self.databases
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.databases.len()
    }

    /// Whether the tree has no descriptors.
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Check every structural invariant of a fully populated tree.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tree is empty, if a descriptor
    /// lacks a required field, or if the default is unset or dangling.
    pub fn validate(&self) -> Result<()> {
        if self.databases.is_empty() {
            return Err(Error::configuration("No database is configured."));
        }
        for descriptor in &self.databases {
            descriptor.check_required()?;
        }
        match self.default.as_deref() {
            None => Err(Error::configuration("There is no default database.")),
            Some(name) if self.get(name).is_none() => Err(Error::configuration(format!(
                "Default database '{}' matches no configured database.",
                name
            ))),
            Some(_) => Ok(()),
        }
    }
}

/// Anything that can populate a [`ConfigurationTree`] from a source.
pub trait ConfigurationLoader {
    /// Human-readable description of the source, used in logs.
    fn source(&self) -> String;

    /// Add descriptors to `tree` and name its default.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the source is missing or malformed.
    fn populate(&self, tree: &mut ConfigurationTree) -> Result<()>;
}
