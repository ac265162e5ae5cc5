//! Public API layer for gdbkit
//!
//! This crate provides the process-level surface of the library:
//! - **GraphHub**: facade over the active configuration and its default database
//! - **TomlConfigLoader**: populates a configuration tree from a `gdbkit.toml` document
//!
//! ## Quick Start
//!
//! ```ignore
//! use gdbkit_api::{GraphHub, TomlConfigLoader};
//!
//! let hub = GraphHub::default();
//! hub.activate_with(&TomlConfigLoader::from_file("gdbkit.toml"))?;
//!
//! let person = hub.type_id("person")?;
//! let name = hub.attribute_id_split("person.name", '.')?;
//!
//! hub.shutdown()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hub;
pub mod loader;

pub use hub::{default_config_path, GraphHub, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use loader::TomlConfigLoader;
