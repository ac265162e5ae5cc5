//! In-memory schema catalog
//!
//! Types and attributes are keyed by name. Identifiers are allocated from two
//! monotonic counters starting at 1 and are never reused, not even after
//! [`Catalog::clear`], so a stale identifier can never alias a new object.

use std::collections::BTreeMap;

use gdbkit_core::{AttributeId, AttributeKind, DataType, Error, ObjectKind, Result, TypeId};
use serde::{Deserialize, Serialize};

/// A node or edge type with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Type identifier
    pub id: TypeId,
    /// Node or edge
    pub kind: ObjectKind,
    /// Attributes by name
    pub attributes: BTreeMap<String, AttributeEntry>,
}

/// An attribute definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEntry {
    /// Attribute identifier
    pub id: AttributeId,
    /// Value type
    pub data_type: DataType,
    /// Indexing behavior
    pub kind: AttributeKind,
}

/// Schema of one database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    next_type: u32,
    next_attribute: u32,
    types: BTreeMap<String, TypeEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            next_type: 1,
            next_attribute: 1,
            types: BTreeMap::new(),
        }
    }
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Resolve a type name, or [`TypeId::INVALID`].
    pub fn find_type(&self, name: &str) -> TypeId {
        self.types.get(name).map(|t| t.id).unwrap_or(TypeId::INVALID)
    }

    /// Resolve an attribute of a type, or [`AttributeId::INVALID`].
    pub fn find_attribute(&self, type_id: TypeId, name: &str) -> AttributeId {
        if !type_id.is_valid() {
            return AttributeId::INVALID;
        }
        self.entry_by_id(type_id)
            .and_then(|t| t.attributes.get(name))
            .map(|a| a.id)
            .unwrap_or(AttributeId::INVALID)
    }

    /// Type entry by name.
    pub fn type_entry(&self, name: &str) -> Option<&TypeEntry> {
        self.types.get(name)
    }

    /// Add a node or edge type.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or already used.
    pub fn add_type(&mut self, name: &str, kind: ObjectKind) -> Result<TypeId> {
        if name.is_empty() {
            return Err(Error::storage("type name must not be empty"));
        }
        if self.types.contains_key(name) {
            return Err(Error::storage(format!("type '{}' already exists", name)));
        }
        let id = TypeId::new(self.next_type);
        self.next_type += 1;
        self.types.insert(
            name.to_string(),
            TypeEntry {
                id,
                kind,
                attributes: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    /// Add an attribute to an existing type.
    ///
    /// # Errors
    ///
    /// Fails if the type does not exist, or the name is empty or already
    /// used on that type.
    pub fn add_attribute(
        &mut self,
        type_id: TypeId,
        name: &str,
        data_type: DataType,
        kind: AttributeKind,
    ) -> Result<AttributeId> {
        if name.is_empty() {
            return Err(Error::storage("attribute name must not be empty"));
        }
        let id = AttributeId::new(self.next_attribute);
        let entry = self
            .types
            .values_mut()
            .find(|t| t.id == type_id)
            .ok_or_else(|| Error::storage(format!("unknown type {}", type_id)))?;
        if entry.attributes.contains_key(name) {
            return Err(Error::storage(format!(
                "attribute '{}' already exists on {}",
                name, type_id
            )));
        }
        entry.attributes.insert(
            name.to_string(),
            AttributeEntry {
                id,
                data_type,
                kind,
            },
        );
        self.next_attribute += 1;
        Ok(id)
    }

    /// Remove every type and attribute. Identifier counters keep going.
    pub fn clear(&mut self) {
        self.types.clear();
    }

    fn entry_by_id(&self, type_id: TypeId) -> Option<&TypeEntry> {
        self.types.values().find(|t| t.id == type_id)
    }
}
