//! Error types for gdbkit
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Looking up a type or attribute name that does not exist is NOT an error:
//! it yields [`TypeId::INVALID`](crate::TypeId::INVALID) or
//! [`AttributeId::INVALID`](crate::AttributeId::INVALID).

use std::io;
use thiserror::Error;

/// Result type alias for gdbkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for gdbkit
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Configuration | `Configuration`, `NotConfigured` | Bad or missing configuration |
/// | Request | `NameResolution` | Malformed composite attribute name |
/// | State | `SessionClosed`, `StoreClosed` | Handle used after close |
/// | System | `Storage`, `IoError` | Engine and infrastructure failures |
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing configuration source, duplicate names,
    /// missing required fields or a default that matches no database.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What is wrong with the configuration
        reason: String,
    },

    /// A composite attribute name does not contain exactly one split character.
    #[error("Attribute name '{name}' cannot be split as expected using '{split}'")]
    NameResolution {
        /// The composite name as given by the caller
        name: String,
        /// The split character
        split: char,
    },

    /// No configuration has been activated (or the last activation failed).
    #[error("No database configuration is active")]
    NotConfigured,

    /// The session was closed by its owner or by a database close.
    #[error("Session is closed")]
    SessionClosed,

    /// The storage handle was closed.
    #[error("Database '{alias}' is closed")]
    StoreClosed {
        /// Alias of the closed database
        alias: String,
    },

    /// Storage engine failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Build a [`Error::Configuration`] from anything printable.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Error::Configuration {
            reason: reason.into(),
        }
    }

    /// Build a [`Error::Storage`] from anything printable.
    pub fn storage(reason: impl Into<String>) -> Self {
        Error::Storage(reason.into())
    }

    /// Returns true for errors caused by the configuration source.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }
}
