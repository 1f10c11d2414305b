//! Runtime entity instances
//!
//! An `EntityInstance` is the value object a generated API manages: field
//! storage plus the column dispatch and value semantics compiled from the
//! schema. The accessor mapping is built once per entity type at compile
//! time and resolved by column identity, never by reflection.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::api::description::ApiDescription;
use crate::error::{DispatchError, Result};
use crate::plan::{ColumnId, ColumnRegistryPlan, ValueSemanticsPlan};
use crate::schema::types::Value;

/// One entity value, driven by its compiled plans
#[derive(Debug, Clone)]
pub struct EntityInstance {
    entity_name: String,
    fields: IndexMap<String, Value>,
    /// Version timestamps; absence means unset
    timestamps: HashMap<String, i64>,
    column_plan: ColumnRegistryPlan,
    value_plan: ValueSemanticsPlan,
}

impl EntityInstance {
    /// Create an instance with every field absent
    pub fn new(api: &ApiDescription) -> Self {
        let fields = api
            .column_plan
            .columns
            .keys()
            .map(|field| (field.clone(), Value::Null))
            .collect();

        Self {
            entity_name: api.entity_name.clone(),
            fields,
            timestamps: HashMap::new(),
            column_plan: api.column_plan.clone(),
            value_plan: api.value_plan.clone(),
        }
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// The column identifier for a field of this entity
    pub fn column_id(&self, field_name: &str) -> Option<ColumnId> {
        self.column_plan.column_id(field_name)
    }

    /// Current value of a column, resolved by identity
    pub fn get_column_value(&self, id: &ColumnId) -> Result<Value> {
        let meta = self.column_plan.resolve(id)?;

        Ok(self
            .fields
            .get(&meta.field_name)
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// Assign a column value
    ///
    /// An un-timestamped write invalidates prior version metadata: any
    /// existing timestamp for the column becomes unset.
    pub fn set_column_value(&mut self, id: &ColumnId, value: Value) -> Result<()> {
        let meta = self.column_plan.resolve(id)?;

        if !value.matches(&meta.value_type) {
            return Err(DispatchError::TypeMismatch {
                column: id.to_string(),
                expected: meta.value_type.to_string(),
            }
            .into());
        }

        let field_name = meta.field_name.clone();
        self.timestamps.remove(&field_name);
        self.fields.insert(field_name, value);

        Ok(())
    }

    /// Assign a versioned column's value and timestamp together
    pub fn set_column_value_with_timestamp(
        &mut self,
        id: &ColumnId,
        value: Value,
        timestamp: i64,
    ) -> Result<()> {
        let meta = self.column_plan.resolve_versioned(id)?;

        if !value.matches(&meta.value_type) {
            return Err(DispatchError::TypeMismatch {
                column: id.to_string(),
                expected: meta.value_type.to_string(),
            }
            .into());
        }

        let field_name = meta.field_name.clone();
        self.fields.insert(field_name.clone(), value);
        self.timestamps.insert(field_name, timestamp);

        Ok(())
    }

    /// Current version timestamp of a versioned column, if set
    pub fn get_column_timestamp(&self, id: &ColumnId) -> Result<Option<i64>> {
        let meta = self.column_plan.resolve_versioned(id)?;

        Ok(self.timestamps.get(&meta.field_name).copied())
    }

    /// Set a versioned column's timestamp without touching its value
    pub fn set_column_timestamp(&mut self, id: &ColumnId, timestamp: i64) -> Result<()> {
        let meta = self.column_plan.resolve_versioned(id)?;

        self.timestamps.insert(meta.field_name.clone(), timestamp);

        Ok(())
    }

    /// Value equality: same entity type and every column field equal
    pub fn equals(&self, other: &EntityInstance) -> bool {
        self.entity_name == other.entity_name
            && self.value_plan.fields_equal(&self.fields, &other.fields)
    }

    /// Aggregate hash consistent with `equals`
    pub fn hash_code(&self) -> i32 {
        self.value_plan.hash_fields(&self.fields)
    }
}

impl std::fmt::Display for EntityInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value_plan.render_fields(&self.fields))
    }
}
