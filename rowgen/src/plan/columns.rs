//! Column registry planner
//!
//! This module lowers a schema's column list into an ordered registry of
//! metadata records and the dispatch table that resolves column identifiers
//! to accessors. Lookup is by column identity; unmatched identifiers fail
//! deterministically with a dispatch error.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::DispatchError;
use crate::schema::types::{EntitySchema, ValueType};

/// Identity of one column: the owning entity plus its storage coordinate
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct ColumnId {
    pub entity_name: String,
    pub family: String,
    pub qualifier: String,
}

impl ColumnId {
    pub fn new(entity_name: &str, family: &str, qualifier: &str) -> Self {
        Self {
            entity_name: entity_name.to_string(),
            family: family.to_string(),
            qualifier: qualifier.to_string(),
        }
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.entity_name, self.family, self.qualifier)
    }
}

/// Metadata record for one column
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnMeta {
    pub id: ColumnId,
    pub field_name: String,
    pub value_type: ValueType,
    pub versioned: bool,
}

/// The planned column registry for one entity
///
/// Keyed by field name, in declaration order; the order defines generated
/// enumeration order and hash combination order downstream.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnRegistryPlan {
    pub entity_name: String,
    pub columns: IndexMap<String, ColumnMeta>,
}

impl ColumnRegistryPlan {
    /// The column identifier for a field of this entity, if it exists
    pub fn column_id(&self, field_name: &str) -> Option<ColumnId> {
        self.columns.get(field_name).map(|meta| meta.id.clone())
    }

    /// Resolve a column identifier to its metadata record
    ///
    /// Identifiers drawn from a foreign registry never match and signal a
    /// programming error in the caller.
    pub fn resolve(&self, id: &ColumnId) -> Result<&ColumnMeta, DispatchError> {
        self.columns
            .values()
            .find(|meta| &meta.id == id)
            .ok_or_else(|| DispatchError::UnrecognizedColumn(id.to_string()))
    }

    /// Resolve a column identifier, requiring a versioned column
    pub fn resolve_versioned(&self, id: &ColumnId) -> Result<&ColumnMeta, DispatchError> {
        let meta = self.resolve(id)?;

        if !meta.versioned {
            return Err(DispatchError::InvalidColumn(id.to_string()));
        }

        Ok(meta)
    }
}

/// Plan the column registry for a validated schema
pub fn plan_column_registry(schema: &EntitySchema) -> ColumnRegistryPlan {
    let mut columns = IndexMap::with_capacity(schema.columns.len());

    for column in &schema.columns {
        let meta = ColumnMeta {
            id: ColumnId::new(
                &schema.entity_name,
                &column.family,
                column.resolved_qualifier(),
            ),
            field_name: column.field_name.clone(),
            value_type: column.value_type.clone(),
            versioned: column.versioned,
        };

        columns.insert(column.field_name.clone(), meta);
    }

    ColumnRegistryPlan {
        entity_name: schema.entity_name.clone(),
        columns,
    }
}
