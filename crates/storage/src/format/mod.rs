//! On-disk byte formats.
//!
//! # Module Structure
//!
//! - `catalog`: schema catalog file format

pub mod catalog;

pub use catalog::{CatalogError, CatalogFile, CATALOG_FORMAT_VERSION, CATALOG_MAGIC};
