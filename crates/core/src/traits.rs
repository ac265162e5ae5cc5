//! Storage engine capability set
//!
//! The lifecycle layer never talks to a concrete storage engine. It consumes
//! the four traits below, which together form the capability set
//! {open, close, newSession, newGraph, resolveType, resolveAttribute, dropSchema}.
//!
//! Thread safety: all handles must be safe to share between threads
//! (requires Send + Sync). Exclusivity of sessions per thread is enforced by
//! the caller, not by the engine.

use std::sync::Arc;

use crate::config::DatabaseDescriptor;
use crate::error::Result;
use crate::types::{AttributeId, AttributeKind, DataType, TypeId};

/// Entry point of a storage engine.
pub trait StorageEngine: Send + Sync {
    /// Short engine name used in logs.
    fn name(&self) -> &str;

    /// Open (or create) the database described by `descriptor`.
    ///
    /// The returned store exclusively owns the storage file until
    /// [`GraphStore::close`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is corrupt, is already
    /// open, or if the tuning reference cannot be read.
    fn open(&self, descriptor: &DatabaseDescriptor) -> Result<Arc<dyn GraphStore>>;
}

/// An open database.
pub trait GraphStore: Send + Sync {
    /// Alias the store was opened with.
    fn alias(&self) -> &str;

    /// Create a new working session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreClosed`](crate::Error::StoreClosed) once the store is closed.
    fn new_session(&self) -> Result<Arc<dyn GraphSession>>;

    /// Release the storage file. Closing an already closed store is a no-op.
    fn close(&self) -> Result<()>;

    /// Whether [`GraphStore::close`] has been called.
    fn is_closed(&self) -> bool;
}

/// A working session against an open store.
pub trait GraphSession: Send + Sync {
    /// The graph view of this session. Repeated calls return the same handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`](crate::Error::SessionClosed) on a closed session.
    fn graph(&self) -> Result<Arc<dyn Graph>>;

    /// Close the session. Closing twice is a no-op.
    fn close(&self) -> Result<()>;

    /// Whether the session was closed, by its owner or by its store.
    fn is_closed(&self) -> bool;
}

/// Schema operations available through a session's graph.
pub trait Graph: Send + Sync {
    /// Resolve a node or edge type name.
    ///
    /// Returns [`TypeId::INVALID`] when no such type exists.
    fn find_type(&self, name: &str) -> Result<TypeId>;

    /// Resolve an attribute of a type.
    ///
    /// Returns [`AttributeId::INVALID`] when the type has no such attribute
    /// or when `type_id` is itself invalid.
    fn find_attribute(&self, type_id: TypeId, name: &str) -> Result<AttributeId>;

    /// Create a node type.
    fn new_node_type(&self, name: &str) -> Result<TypeId>;

    /// Create an edge type.
    fn new_edge_type(&self, name: &str, directed: bool) -> Result<TypeId>;

    /// Create an attribute on an existing type.
    fn new_attribute(
        &self,
        type_id: TypeId,
        name: &str,
        data_type: DataType,
        kind: AttributeKind,
    ) -> Result<AttributeId>;

    /// Remove every type and attribute from the database.
    fn drop_schema(&self) -> Result<()>;
}
