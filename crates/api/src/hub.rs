//! Process-level facade over the active configuration
//!
//! A [`GraphHub`] holds at most one active [`ConfigurationTree`], builds one
//! [`DatabaseManager`] per configured database, and forwards convenience calls
//! to the default database. The host owns the hub and shuts it down
//! explicitly.
//!
//! ## Activation
//!
//! Activating a configuration first closes every manager of the previous one,
//! then validates the new tree and opens its default database. If any step
//! fails the hub is left unconfigured and every later call returns
//! [`Error::NotConfigured`] until a configuration activates successfully.
//!
//! ## Discovery
//!
//! [`GraphHub::discover`] looks for a configuration document in the
//! `GDBKIT_CONFIG` environment variable, then in `gdbkit.toml` in the current
//! directory. Discovery never fails; problems are logged.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gdbkit_core::{
    AttributeId, ConfigurationLoader, ConfigurationTree, DatabaseDescriptor, Error, Graph,
    GraphSession, Result, StorageEngine, TypeId,
};
use gdbkit_engine::DatabaseManager;
use gdbkit_storage::FileEngine;
use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::loader::TomlConfigLoader;

/// Environment variable naming the configuration document used by discovery.
pub const CONFIG_ENV_VAR: &str = "GDBKIT_CONFIG";

/// Config file name looked up in the working directory by discovery.
pub const CONFIG_FILE_NAME: &str = "gdbkit.toml";

/// An activated configuration and its managers.
struct Active {
    tree: Arc<ConfigurationTree>,
    source: Option<String>,
    managers: HashMap<String, Arc<DatabaseManager>>,
    default: Arc<DatabaseManager>,
}

impl Active {
    fn build(
        tree: ConfigurationTree,
        source: Option<String>,
        engine: &Arc<dyn StorageEngine>,
    ) -> Result<Self> {
        tree.validate()?;
        let managers: HashMap<String, Arc<DatabaseManager>> = tree
            .descriptors()
            .iter()
            .map(|d| {
                let manager = DatabaseManager::new(d.clone(), Arc::clone(engine));
                (d.name().to_string(), Arc::new(manager))
            })
            .collect();
        let default = tree
            .default_name()
            .and_then(|name| managers.get(name))
            .cloned()
            .ok_or_else(|| Error::configuration("There is no default database."))?;
        Ok(Active {
            tree: Arc::new(tree),
            source,
            managers,
            default,
        })
    }

    /// Close every manager, returning the first failure.
    fn close_all(&self) -> Result<()> {
        let mut first = None;
        for (name, manager) in &self.managers {
            if let Err(e) = manager.close() {
                warn!(target: "gdbkit::hub", database = %name, error = %e, "Failed to close database");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Retire every manager so handles kept by callers cannot reopen.
    fn retire_all(&self) -> Result<()> {
        let mut first = None;
        for (name, manager) in &self.managers {
            if let Err(e) = manager.retire() {
                warn!(target: "gdbkit::hub", database = %name, error = %e, "Failed to close database");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

/// Facade over the active configuration and its default database.
pub struct GraphHub {
    engine: Arc<dyn StorageEngine>,
    active: RwLock<Option<Active>>,
}

impl GraphHub {
    /// Unconfigured hub opening databases through `engine`.
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        GraphHub {
            engine,
            active: RwLock::new(None),
        }
    }

    /// Hub configured from the default resource, if one can be found.
    ///
    /// Failures are logged and leave the hub unconfigured.
    pub fn discover(engine: Arc<dyn StorageEngine>) -> Self {
        let hub = Self::new(engine);
        match default_config_path() {
            Some(path) => {
                let loader = TomlConfigLoader::from_file(&path);
                if let Err(e) = hub.activate_with(&loader) {
                    error!(
                        target: "gdbkit::hub",
                        path = ?path,
                        error = %e,
                        "Default configuration cannot be loaded"
                    );
                }
            }
            None => {
                error!(
                    target: "gdbkit::hub",
                    env = CONFIG_ENV_VAR,
                    file = CONFIG_FILE_NAME,
                    "No default configuration found"
                );
            }
        }
        hub
    }

    // =========================================================================
    // Activation
    // =========================================================================

    /// Adopt `tree` as the active configuration and open its default database.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `tree` does not validate, or the
    /// storage failure if the default database cannot be opened. The hub is
    /// unconfigured afterwards in both cases.
    pub fn activate(&self, tree: ConfigurationTree) -> Result<()> {
        self.install(None, |_| Ok(tree))
    }

    /// Populate an empty tree with `loader`, then activate it.
    pub fn activate_with(&self, loader: &dyn ConfigurationLoader) -> Result<()> {
        self.install(Some(loader.source()), |tree| {
            loader.populate(tree)?;
            Ok(std::mem::take(tree))
        })
    }

    fn install(
        &self,
        source: Option<String>,
        build: impl FnOnce(&mut ConfigurationTree) -> Result<ConfigurationTree>,
    ) -> Result<()> {
        let mut active = self.active.write();
        if let Some(previous) = active.take() {
            if let Err(e) = previous.retire_all() {
                warn!(target: "gdbkit::hub", error = %e, "Previous configuration did not close cleanly");
            }
            info!(target: "gdbkit::hub", source = ?previous.source, "Configuration deactivated");
        }

        let mut scratch = ConfigurationTree::new();
        let next = build(&mut scratch).and_then(|tree| Active::build(tree, source, &self.engine));
        let next = match next {
            Ok(next) => next,
            Err(e) => {
                warn!(target: "gdbkit::hub", error = %e, "Configuration rejected");
                return Err(e);
            }
        };
        next.default.open()?;

        info!(
            target: "gdbkit::hub",
            source = ?next.source,
            databases = next.managers.len(),
            default = next.default.descriptor().name(),
            "Configuration activated"
        );
        *active = Some(next);
        Ok(())
    }

    /// Close every database and forget the active configuration.
    pub fn deactivate(&self) -> Result<()> {
        match self.active.write().take() {
            Some(previous) => {
                info!(target: "gdbkit::hub", source = ?previous.source, "Configuration deactivated");
                previous.retire_all()
            }
            None => Ok(()),
        }
    }

    /// Whether a configuration is active.
    pub fn is_configured(&self) -> bool {
        self.active.read().is_some()
    }

    /// The active configuration.
    pub fn configuration(&self) -> Result<Arc<ConfigurationTree>> {
        self.with_active(|active| Ok(Arc::clone(&active.tree)))
    }

    /// Description of the loader that populated the active configuration;
    /// `None` when it was activated from a tree directly.
    pub fn source(&self) -> Result<Option<String>> {
        self.with_active(|active| Ok(active.source.clone()))
    }

    /// Descriptors of every configured database.
    pub fn databases(&self) -> Result<Vec<DatabaseDescriptor>> {
        self.with_active(|active| Ok(active.tree.descriptors().to_vec()))
    }

    /// Manager of the configured database called `name`.
    ///
    /// Once the hub switches or drops its configuration the manager is
    /// retired: it is closed and its queries fail with
    /// [`Error::NotConfigured`] instead of reopening the database.
    pub fn database(&self, name: &str) -> Result<Arc<DatabaseManager>> {
        self.with_active(|active| {
            active.managers.get(name).cloned().ok_or_else(|| {
                Error::configuration(format!("Database '{}' is not configured.", name))
            })
        })
    }

    fn with_active<T>(&self, f: impl FnOnce(&Active) -> Result<T>) -> Result<T> {
        match self.active.read().as_ref() {
            Some(active) => f(active),
            None => Err(Error::NotConfigured),
        }
    }

    /// Run `f` on the default manager. Activation waits for `f` to finish.
    fn with_default<T>(&self, f: impl FnOnce(&DatabaseManager) -> Result<T>) -> Result<T> {
        self.with_active(|active| f(&active.default))
    }

    // =========================================================================
    // Default database
    // =========================================================================

    /// Alias of the default database.
    pub fn alias(&self) -> Result<String> {
        self.with_default(|m| Ok(m.descriptor().alias().to_string()))
    }

    /// Storage path of the default database, as configured.
    pub fn path(&self) -> Result<PathBuf> {
        self.with_default(|m| Ok(m.descriptor().path().to_path_buf()))
    }

    /// Tuning file of the default database, if any.
    pub fn tuning(&self) -> Result<Option<PathBuf>> {
        self.with_default(|m| Ok(m.descriptor().tuning().map(Path::to_path_buf)))
    }

    /// Open the default database. No-op if it is open.
    pub fn start(&self) -> Result<()> {
        self.with_default(|m| m.open())
    }

    /// Close every open database of the active configuration.
    ///
    /// The configuration stays active; the next call reopens the default.
    pub fn shutdown(&self) -> Result<()> {
        self.with_active(|active| active.close_all())
    }

    /// Close and reopen the default database.
    pub fn restart(&self) -> Result<()> {
        self.with_default(|m| m.restart())
    }

    /// The calling thread's session on the default database.
    pub fn session(&self) -> Result<Arc<dyn GraphSession>> {
        self.with_default(|m| m.session())
    }

    /// The calling thread's graph on the default database.
    pub fn graph(&self) -> Result<Arc<dyn Graph>> {
        self.with_default(|m| m.graph())
    }

    /// See [`DatabaseManager::type_id`].
    pub fn type_id(&self, name: &str) -> Result<TypeId> {
        self.with_default(|m| m.type_id(name))
    }

    /// See [`DatabaseManager::attribute_id`].
    pub fn attribute_id(&self, type_name: &str, name: &str) -> Result<AttributeId> {
        self.with_default(|m| m.attribute_id(type_name, name))
    }

    /// See [`DatabaseManager::attribute_id_split`].
    pub fn attribute_id_split(&self, composite: &str, split: char) -> Result<AttributeId> {
        self.with_default(|m| m.attribute_id_split(composite, split))
    }

    /// Drop the schema of the default database.
    pub fn drop_schema(&self) -> Result<()> {
        self.with_default(|m| m.drop_schema())
    }
}

impl Default for GraphHub {
    /// Unconfigured hub over the bundled file engine.
    fn default() -> Self {
        Self::new(Arc::new(FileEngine::new()))
    }
}

impl Drop for GraphHub {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().as_ref() {
            if active.managers.values().any(|m| m.is_open()) {
                warn!(
                    target: "gdbkit::hub",
                    "GraphHub dropped with open databases; call shutdown() for a clean shutdown"
                );
            }
        }
    }
}

/// Location of the default configuration document, if any.
///
/// `GDBKIT_CONFIG` wins even when it names a missing file, so the failure is
/// reported instead of silently falling back.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(CONFIG_ENV_VAR) {
        if !value.is_empty() {
            return Some(PathBuf::from(value));
        }
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    local.is_file().then_some(local)
}
