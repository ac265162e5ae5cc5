//! Process-wide registry of open catalog files
//!
//! The `fs2` lock on a database's lock file keeps other processes out. This
//! registry keeps a second store in the *same* process from opening a file
//! that is already open, and reports it with a clear error instead of a lock
//! failure.
//!
//! Uses parking_lot::Mutex so a panic while holding the lock does not poison
//! every later open.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;

/// Canonical paths of every catalog file currently open in this process
pub static OPEN_STORES: Lazy<Mutex<HashSet<PathBuf>>> = Lazy::new(|| Mutex::new(HashSet::new()));
