//! gdbkit - Configuration-driven lifecycle manager for embedded graph databases
//!
//! gdbkit turns a declarative list of databases into ready-to-use handles:
//! it opens the default database on activation, hands every thread its own
//! working session, and resolves type and attribute names to identifiers.
//!
//! # Quick Start
//!
//! ```ignore
//! use gdbkit::{ConfigurationTree, DatabaseDescriptor, GraphHub};
//!
//! let hub = GraphHub::default();
//! hub.activate(ConfigurationTree::single(DatabaseDescriptor::new(
//!     "main", "MyGDB", "MyGDB.dex",
//! )))?;
//!
//! let graph = hub.graph()?;
//! let person = graph.new_node_type("person")?;
//! assert_eq!(hub.type_id("person")?, person);
//!
//! hub.shutdown()?;
//! ```
//!
//! # Architecture
//!
//! [`GraphHub`] owns the active configuration and one [`DatabaseManager`] per
//! database. Managers open storage through a [`StorageEngine`]; the bundled
//! [`FileEngine`] keeps the schema catalog in a single locked file.

pub use gdbkit_api::*;
pub use gdbkit_core::{
    AttributeId, AttributeKind, ConfigurationLoader, ConfigurationTree, DataType,
    DatabaseDescriptor, Error, Graph, GraphSession, GraphStore, ObjectKind, Result, StorageEngine,
    TypeId,
};
pub use gdbkit_engine::{split_attribute_name, DatabaseManager, DatabaseState};
pub use gdbkit_storage::{FileEngine, StorageTuning};
