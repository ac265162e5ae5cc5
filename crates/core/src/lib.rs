//! Core types and traits for gdbkit
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error type hierarchy shared by every layer
//! - TypeId / AttributeId: schema identifiers with a reserved invalid sentinel
//! - DatabaseDescriptor / ConfigurationTree: the declarative database configuration
//! - ConfigurationLoader: contract for anything that populates a configuration tree
//! - Traits: the storage engine capability set (StorageEngine, GraphStore, GraphSession, Graph)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use config::{ConfigurationLoader, ConfigurationTree, DatabaseDescriptor};
pub use error::{Error, Result};
pub use traits::{Graph, GraphSession, GraphStore, StorageEngine};
pub use types::{AttributeId, AttributeKind, DataType, ObjectKind, TypeId};
