//! Schema identifier types
//!
//! The storage engine hands out small integer identifiers for node types,
//! edge types and attributes. The value `0` is reserved on both identifier
//! spaces to mean "unknown name" and is never assigned to a real object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node or edge type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    /// Sentinel returned for type names that do not exist.
    pub const INVALID: TypeId = TypeId(0);

    /// Wrap a raw identifier.
    pub const fn new(raw: u32) -> Self {
        TypeId(raw)
    }

    /// Raw identifier value.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns false for the [`TypeId::INVALID`] sentinel.
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "type#{}", self.0)
        } else {
            f.write_str("type#invalid")
        }
    }
}

/// Identifier of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeId(u32);

impl AttributeId {
    /// Sentinel returned for attribute names that do not exist.
    pub const INVALID: AttributeId = AttributeId(0);

    /// Wrap a raw identifier.
    pub const fn new(raw: u32) -> Self {
        AttributeId(raw)
    }

    /// Raw identifier value.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns false for the [`AttributeId::INVALID`] sentinel.
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "attr#{}", self.0)
        } else {
            f.write_str("attr#invalid")
        }
    }
}

/// What kind of objects a type describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Node type
    Node,
    /// Edge type
    Edge {
        /// Whether edges of this type have a tail and a head
        directed: bool,
    },
}

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Boolean
    Boolean,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    Long,
    /// 64-bit float
    Double,
    /// Timestamp
    Timestamp,
    /// Short string
    String,
    /// Large text
    Text,
    /// Object identifier
    Oid,
}

/// Indexing behavior of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Not indexed
    Basic,
    /// Indexed
    Indexed,
    /// Indexed and unique
    Unique,
}
