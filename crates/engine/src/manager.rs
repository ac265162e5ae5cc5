//! Database lifecycle manager
//!
//! One [`DatabaseManager`] exists per configured database. It owns the
//! storage handle while the database is open and the registry of per-thread
//! sessions created against it.
//!
//! ## States
//!
//! ```text
//!            open()                       close()
//!   Closed ---------> Open    Open ---------------------> Closed
//!   (initial)                 (closes every registered session, then the store)
//! ```
//!
//! `open` and `close` are idempotent. `restart` is `close` followed by `open`.
//! Every query auto-opens a closed database.
//!
//! ## Locking
//!
//! The store slot sits behind an `RwLock`. Transitions take the write side.
//! Session creation and schema lookups run under the read side, so a `close`
//! cannot interleave with them: either the work completes against the open
//! store (and `close` then closes the session it created), or it observes the
//! database closed and reopens it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;

use gdbkit_core::{
    AttributeId, DatabaseDescriptor, Error, Graph, GraphSession, GraphStore, Result,
    StorageEngine, TypeId,
};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::names::split_attribute_name;
use crate::registry::{SessionRegistry, ThreadSession};

/// Lifecycle state of a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseState {
    /// No storage handle is held.
    Closed,
    /// The storage handle is held and sessions may be handed out.
    Open,
}

/// State machine, session registry and identifier resolution for one database.
pub struct DatabaseManager {
    descriptor: DatabaseDescriptor,
    engine: Arc<dyn StorageEngine>,
    store: RwLock<Option<Arc<dyn GraphStore>>>,
    sessions: SessionRegistry,
    opens: AtomicU64,
    retired: AtomicBool,
}

impl DatabaseManager {
    /// Create a closed manager for `descriptor`.
    pub fn new(descriptor: DatabaseDescriptor, engine: Arc<dyn StorageEngine>) -> Self {
        DatabaseManager {
            descriptor,
            engine,
            store: RwLock::new(None),
            sessions: SessionRegistry::new(),
            opens: AtomicU64::new(0),
            retired: AtomicBool::new(false),
        }
    }

    /// The descriptor this manager was built from.
    pub fn descriptor(&self) -> &DatabaseDescriptor {
        &self.descriptor
    }

    /// Current state.
    pub fn state(&self) -> DatabaseState {
        if self.store.read().is_some() {
            DatabaseState::Open
        } else {
            DatabaseState::Closed
        }
    }

    /// Whether the database is open.
    pub fn is_open(&self) -> bool {
        self.state() == DatabaseState::Open
    }

    /// How many times the storage engine actually opened this database.
    pub fn open_count(&self) -> u64 {
        self.opens.load(Ordering::SeqCst)
    }

    /// Whether [`DatabaseManager::retire`] has been called.
    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::SeqCst)
    }

    /// Number of threads with a registered session.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the database. No-op if already open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] once the manager is retired, and
    /// propagates storage engine failures; the database stays closed.
    pub fn open(&self) -> Result<()> {
        let mut slot = self.store.write();
        if slot.is_some() {
            return Ok(());
        }
        if self.is_retired() {
            return Err(Error::NotConfigured);
        }
        let store = self.engine.open(&self.descriptor)?;
        self.opens.fetch_add(1, Ordering::SeqCst);
        *slot = Some(store);
        info!(
            target: "gdbkit::manager",
            database = self.descriptor.name(),
            alias = self.descriptor.alias(),
            path = ?self.descriptor.path(),
            engine = self.engine.name(),
            "Database opened"
        );
        Ok(())
    }

    /// Close the database. No-op if already closed.
    ///
    /// Every session handed out since the last open is closed first; callers
    /// still holding one will see it report `is_closed()`.
    ///
    /// # Errors
    ///
    /// Propagates the storage engine's close failure. The manager is Closed
    /// either way.
    pub fn close(&self) -> Result<()> {
        let mut slot = self.store.write();
        let store = match slot.take() {
            Some(store) => store,
            None => return Ok(()),
        };
        let sessions = self.sessions.close_all();
        store.close()?;
        info!(
            target: "gdbkit::manager",
            database = self.descriptor.name(),
            sessions,
            "Database closed"
        );
        Ok(())
    }

    /// Close the database for good.
    ///
    /// Used when the configuration that built this manager is replaced. Every
    /// later open, including the auto-open of queries, fails with
    /// [`Error::NotConfigured`].
    pub fn retire(&self) -> Result<()> {
        self.retired.store(true, Ordering::SeqCst);
        debug!(target: "gdbkit::manager", database = self.descriptor.name(), "Manager retired");
        self.close()
    }

    /// Close then open. Sessions from before the restart are stale afterwards.
    pub fn restart(&self) -> Result<()> {
        self.close()?;
        self.open()
    }

    /// Run `f` against the open store, opening it first if needed.
    fn with_store<T>(&self, mut f: impl FnMut(&Arc<dyn GraphStore>) -> Result<T>) -> Result<T> {
        loop {
            {
                let slot = self.store.read();
                if let Some(store) = slot.as_ref() {
                    return f(store);
                }
            }
            debug!(target: "gdbkit::manager", database = self.descriptor.name(), "Auto-opening database");
            self.open()?;
        }
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// The calling thread's session bundle, created on first use.
    pub fn thread_session(&self) -> Result<Arc<ThreadSession>> {
        let thread = std::thread::current().id();
        self.with_store(|store| self.session_for(store, thread))
    }

    fn session_for(&self, store: &Arc<dyn GraphStore>, thread: ThreadId) -> Result<Arc<ThreadSession>> {
        self.sessions.get_or_create(thread, || {
            let session = store.new_session()?;
            let graph = session.graph()?;
            Ok(ThreadSession::new(thread, session, graph))
        })
    }

    /// The calling thread's exclusive session.
    ///
    /// Repeated calls from one thread return the same handle until it is
    /// closed (by the caller, [`DatabaseManager::close_session`], `close` or
    /// `restart`). Different threads never share a handle.
    ///
    /// Releasing the session is the caller's job: a thread that exits without
    /// calling [`DatabaseManager::close_session`] leaves its session registered
    /// until the next `close` or `restart`.
    pub fn session(&self) -> Result<Arc<dyn GraphSession>> {
        Ok(Arc::clone(self.thread_session()?.session()))
    }

    /// Graph of the calling thread's session.
    pub fn graph(&self) -> Result<Arc<dyn Graph>> {
        Ok(Arc::clone(self.thread_session()?.graph()))
    }

    /// Close and forget the calling thread's session, if any.
    pub fn close_session(&self) -> Result<bool> {
        self.sessions.release(std::thread::current().id())
    }

    /// Run `f` against the calling thread's graph while the database is held open.
    fn with_graph<T>(&self, mut f: impl FnMut(&dyn Graph) -> Result<T>) -> Result<T> {
        let thread = std::thread::current().id();
        self.with_store(|store| {
            let bundle = self.session_for(store, thread)?;
            f(bundle.graph().as_ref())
        })
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// Identifier of a node or edge type, or [`TypeId::INVALID`].
    pub fn type_id(&self, name: &str) -> Result<TypeId> {
        self.with_graph(|graph| graph.find_type(name))
    }

    /// Identifier of an attribute, or [`AttributeId::INVALID`] if either the
    /// type or the attribute does not exist.
    pub fn attribute_id(&self, type_name: &str, name: &str) -> Result<AttributeId> {
        self.with_graph(|graph| {
            let type_id = graph.find_type(type_name)?;
            if !type_id.is_valid() {
                return Ok(AttributeId::INVALID);
            }
            graph.find_attribute(type_id, name)
        })
    }

    /// Identifier of an attribute given as `type<split>attribute`.
    ///
    /// # Errors
    ///
    /// Returns [`gdbkit_core::Error::NameResolution`] unless `split` occurs
    /// exactly once in `composite`.
    pub fn attribute_id_split(&self, composite: &str, split: char) -> Result<AttributeId> {
        let (type_name, name) = split_attribute_name(composite, split)?;
        self.attribute_id(type_name, name)
    }

    /// Remove every type and attribute.
    ///
    /// Lookups always go to the engine, so identifiers resolved before the
    /// drop resolve to the invalid sentinel afterwards.
    pub fn drop_schema(&self) -> Result<()> {
        self.with_graph(|graph| graph.drop_schema())?;
        info!(target: "gdbkit::manager", database = self.descriptor.name(), "Schema dropped");
        Ok(())
    }
}

impl Drop for DatabaseManager {
    fn drop(&mut self) {
        if self.store.get_mut().is_some() {
            warn!(
                target: "gdbkit::manager",
                database = self.descriptor.name(),
                "DatabaseManager dropped while open; call close() for a clean shutdown"
            );
        }
    }
}
