//! File-backed reference storage engine for gdbkit
//!
//! This crate implements the storage capability set from `gdbkit-core`:
//! - FileEngine: opens or creates a single catalog file per database
//! - FileStore: an open database, holding an exclusive file lock
//! - FileSession / FileGraph: working sessions and their schema view
//! - Catalog: node types, edge types and attributes, persisted atomically
//! - StorageTuning: optional engine tuning file (`conf` reference)
//!
//! Only the schema is stored. The engine exists so the lifecycle layer can be
//! used and tested end to end without an external graph database.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod engine;
pub mod format;
pub mod registry;
pub mod tuning;

pub use catalog::Catalog;
pub use engine::{FileEngine, FileGraph, FileSession, FileStore};
pub use format::{CatalogError, CatalogFile, CATALOG_FORMAT_VERSION, CATALOG_MAGIC};
pub use registry::OPEN_STORES;
pub use tuning::StorageTuning;
