//! Database lifecycle engine for gdbkit
//!
//! This crate owns everything that happens to a single configured database
//! after activation:
//! - DatabaseManager: Closed/Open state machine with open, close, restart
//! - SessionRegistry: one exclusive working session per calling thread
//! - Schema identifier resolution, including composite `type.attribute` names
//!
//! The manager is the only component that holds a storage handle. It talks to
//! the storage engine exclusively through the `gdbkit-core` capability traits.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod names;
pub mod registry;

pub use manager::{DatabaseManager, DatabaseState};
pub use names::split_attribute_name;
pub use registry::{SessionRegistry, ThreadSession};
