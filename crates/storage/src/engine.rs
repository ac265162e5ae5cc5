//! File-backed implementation of the storage capability set
//!
//! One database is one catalog file. Opening a database:
//! 1. Reads the tuning reference, if any
//! 2. Creates an empty catalog file if none exists
//! 3. Registers the canonical path in [`OPEN_STORES`]
//! 4. Takes an exclusive `fs2` lock on `<path>.lock`
//! 5. Loads the catalog into memory
//!
//! Every schema change is persisted before it becomes visible to readers.
//! Sessions share the store's catalog; closing the store closes every session
//! derived from it.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gdbkit_core::{
    AttributeId, AttributeKind, DataType, DatabaseDescriptor, Error, Graph, GraphSession,
    GraphStore, ObjectKind, Result, StorageEngine, TypeId,
};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::format::catalog::sibling;
use crate::format::CatalogFile;
use crate::registry::OPEN_STORES;
use crate::tuning::StorageTuning;

/// Storage engine that keeps each database in a single catalog file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileEngine;

impl FileEngine {
    /// Create the engine.
    pub fn new() -> Self {
        FileEngine
    }
}

impl StorageEngine for FileEngine {
    fn name(&self) -> &str {
        "file"
    }

    fn open(&self, descriptor: &DatabaseDescriptor) -> Result<Arc<dyn GraphStore>> {
        Ok(Arc::new(FileStore::open(descriptor)?))
    }
}

/// An open catalog file.
pub struct FileStore {
    alias: String,
    path: PathBuf,
    tuning: StorageTuning,
    catalog: Arc<RwLock<Catalog>>,
    closed: Arc<AtomicBool>,
    lock_file: Mutex<Option<File>>,
}

impl FileStore {
    /// Open or create the database described by `descriptor`.
    ///
    /// # Errors
    ///
    /// Fails if the tuning file is unreadable, if the file is already open in
    /// this process or locked by another one, or if the catalog is corrupt.
    pub fn open(descriptor: &DatabaseDescriptor) -> Result<Self> {
        let tuning = StorageTuning::resolve(descriptor.tuning())?;
        let path = descriptor.path();

        // Hold the registry for the whole open so two threads cannot both
        // pass the "not yet open" check for the same file.
        let mut registry = OPEN_STORES.lock();

        if !path.exists() {
            if tuning.storage.read_only {
                return Err(Error::storage(format!(
                    "database '{}' does not exist and tuning is read-only",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            CatalogFile::persist(path, &Catalog::new(), tuning.storage.sync_writes)?;
            info!(target: "gdbkit::storage", path = ?path, "Created new database file");
        }

        let canonical = path.canonicalize()?;
        if registry.contains(&canonical) {
            return Err(Error::storage(format!(
                "database at '{}' is already open in this process",
                canonical.display()
            )));
        }

        let lock_path = sibling(&canonical, ".lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| Error::storage(format!("failed to open lock file: {}", e)))?;
        fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| {
            Error::storage(format!(
                "database at '{}' is already in use by another process",
                canonical.display()
            ))
        })?;

        let catalog = match CatalogFile::load(&canonical) {
            Ok(catalog) => catalog,
            Err(e) => {
                drop(lock_file);
                let _ = std::fs::remove_file(&lock_path);
                return Err(e.into());
            }
        };

        registry.insert(canonical.clone());
        info!(
            target: "gdbkit::storage",
            alias = descriptor.alias(),
            path = ?canonical,
            types = catalog.type_count(),
            "Opened database"
        );

        Ok(FileStore {
            alias: descriptor.alias().to_string(),
            path: canonical,
            tuning,
            catalog: Arc::new(RwLock::new(catalog)),
            closed: Arc::new(AtomicBool::new(false)),
            lock_file: Mutex::new(Some(lock_file)),
        })
    }

    /// Canonical path of the catalog file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tuning the store was opened with.
    pub fn tuning(&self) -> &StorageTuning {
        &self.tuning
    }

    /// Release the file lock and the registry entry.
    fn release(&self) {
        if let Some(lock_file) = self.lock_file.lock().take() {
            if let Err(e) = fs2::FileExt::unlock(&lock_file) {
                warn!(target: "gdbkit::storage", error = %e, "Failed to unlock database");
            }
            drop(lock_file);
            let _ = std::fs::remove_file(sibling(&self.path, ".lock"));
        }
        OPEN_STORES.lock().remove(&self.path);
    }
}

impl GraphStore for FileStore {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn new_session(&self) -> Result<Arc<dyn GraphSession>> {
        if self.is_closed() {
            return Err(Error::StoreClosed {
                alias: self.alias.clone(),
            });
        }
        let graph = FileGraph {
            catalog: Arc::clone(&self.catalog),
            path: self.path.clone(),
            sync_writes: self.tuning.storage.sync_writes,
            read_only: self.tuning.storage.read_only,
            session_closed: AtomicBool::new(false),
            store_closed: Arc::clone(&self.closed),
        };
        debug!(target: "gdbkit::storage", alias = %self.alias, "New session");
        Ok(Arc::new(FileSession {
            graph: Arc::new(graph),
        }))
    }

    fn close(&self) -> Result<()> {
        // Wait for in-flight schema writes; later ones see `closed` under the lock.
        let _catalog = self.catalog.write();
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.release();
        info!(target: "gdbkit::storage", alias = %self.alias, path = ?self.path, "Closed database");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        let _catalog = self.catalog.write();
        if !self.closed.swap(true, Ordering::SeqCst) {
            warn!(
                target: "gdbkit::storage",
                alias = %self.alias,
                "Database dropped without close; releasing lock"
            );
            self.release();
        }
    }
}

/// A working session of a [`FileStore`].
pub struct FileSession {
    graph: Arc<FileGraph>,
}

impl GraphSession for FileSession {
    fn graph(&self) -> Result<Arc<dyn Graph>> {
        self.graph.check_open()?;
        Ok(Arc::clone(&self.graph) as Arc<dyn Graph>)
    }

    fn close(&self) -> Result<()> {
        self.graph.session_closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.graph.is_closed()
    }
}

/// Schema view of a [`FileSession`].
pub struct FileGraph {
    catalog: Arc<RwLock<Catalog>>,
    path: PathBuf,
    sync_writes: bool,
    read_only: bool,
    session_closed: AtomicBool,
    store_closed: Arc<AtomicBool>,
}

impl FileGraph {
    fn is_closed(&self) -> bool {
        self.session_closed.load(Ordering::SeqCst) || self.store_closed.load(Ordering::SeqCst)
    }

    fn check_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        Ok(())
    }

    /// Apply `change` to a copy of the catalog, persist it, then publish it.
    fn mutate<T>(&self, change: impl FnOnce(&mut Catalog) -> Result<T>) -> Result<T> {
        self.check_open()?;
        if self.read_only {
            return Err(Error::storage("database is read-only"));
        }
        let mut guard = self.catalog.write();
        // The store may have been closed while we waited for the lock.
        self.check_open()?;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        CatalogFile::persist(&self.path, &next, self.sync_writes)?;
        *guard = next;
        Ok(out)
    }
}

impl Graph for FileGraph {
    fn find_type(&self, name: &str) -> Result<TypeId> {
        self.check_open()?;
        Ok(self.catalog.read().find_type(name))
    }

    fn find_attribute(&self, type_id: TypeId, name: &str) -> Result<AttributeId> {
        self.check_open()?;
        Ok(self.catalog.read().find_attribute(type_id, name))
    }

    fn new_node_type(&self, name: &str) -> Result<TypeId> {
        self.mutate(|catalog| catalog.add_type(name, ObjectKind::Node))
    }

    fn new_edge_type(&self, name: &str, directed: bool) -> Result<TypeId> {
        self.mutate(|catalog| catalog.add_type(name, ObjectKind::Edge { directed }))
    }

    fn new_attribute(
        &self,
        type_id: TypeId,
        name: &str,
        data_type: DataType,
        kind: AttributeKind,
    ) -> Result<AttributeId> {
        self.mutate(|catalog| catalog.add_attribute(type_id, name, data_type, kind))
    }

    fn drop_schema(&self) -> Result<()> {
        self.mutate(|catalog| {
            catalog.clear();
            Ok(())
        })
    }
}
