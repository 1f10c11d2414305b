//! Value-semantics planner
//!
//! This module derives the equality, hash and string-representation
//! composition rules from a schema's column list. Combination order is the
//! column declaration order throughout, so hash-based containers of entities
//! stay consistent with equality.

use indexmap::IndexMap;
use serde::Serialize;

use crate::schema::types::{EntitySchema, Value, ValueType};

/// Shared absent value for null-safe field lookups
static NULL: Value = Value::Null;

/// One per-column fragment of the derived value semantics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SemanticFragment {
    pub field_name: String,
    /// Element-wise semantics instead of structural
    pub array: bool,
    /// Quoted in the string representation
    pub quoted: bool,
}

/// The planned value semantics for one entity
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValueSemanticsPlan {
    pub entity_name: String,
    pub fragments: Vec<SemanticFragment>,
}

/// Plan the value semantics for a validated schema
pub fn plan_value_semantics(schema: &EntitySchema) -> ValueSemanticsPlan {
    let fragments = schema
        .columns
        .iter()
        .map(|column| SemanticFragment {
            field_name: column.field_name.clone(),
            array: column.value_type.is_array(),
            quoted: column.value_type == ValueType::Str,
        })
        .collect();

    ValueSemanticsPlan {
        entity_name: schema.entity_name.clone(),
        fragments,
    }
}

impl ValueSemanticsPlan {
    /// Field-wise equality in declared order, short-circuiting on mismatch
    ///
    /// Arrays compare element-wise; absent values compare null-safe. Missing
    /// fields count as absent.
    pub fn fields_equal(
        &self,
        a: &IndexMap<String, Value>,
        b: &IndexMap<String, Value>,
    ) -> bool {
        self.fragments.iter().all(|fragment| {
            let left = a.get(&fragment.field_name).unwrap_or(&NULL);
            let right = b.get(&fragment.field_name).unwrap_or(&NULL);
            left == right
        })
    }

    /// Aggregate hash over the column fields
    ///
    /// Non-array fields combine first, order-sensitive and null-safe; array
    /// fields then fold in one at a time with `31 * result + elements_hash`.
    /// When the schema has no non-array field, the first array's own
    /// elements hash seeds the accumulator. Arithmetic wraps at 32 bits.
    pub fn hash_fields(&self, fields: &IndexMap<String, Value>) -> i32 {
        let scalar_count = self.fragments.iter().filter(|f| !f.array).count();
        let mut result: i32 = 0;
        let mut seeded = false;

        if scalar_count > 0 {
            result = 1;
            for fragment in self.fragments.iter().filter(|f| !f.array) {
                let value = fields.get(&fragment.field_name).unwrap_or(&NULL);
                result = result.wrapping_mul(31).wrapping_add(value_hash(value));
            }
            seeded = true;
        }

        for fragment in self.fragments.iter().filter(|f| f.array) {
            let value = fields.get(&fragment.field_name).unwrap_or(&NULL);
            let elements_hash = value_hash(value);

            if seeded {
                result = result.wrapping_mul(31).wrapping_add(elements_hash);
            } else {
                result = elements_hash;
                seeded = true;
            }
        }

        result
    }

    /// Stable string representation: `EntityName{f1=v1, f2=v2}`
    pub fn render_fields(&self, fields: &IndexMap<String, Value>) -> String {
        let parts: Vec<String> = self
            .fragments
            .iter()
            .map(|fragment| {
                let value = fields.get(&fragment.field_name).unwrap_or(&NULL);
                let rendered = if fragment.quoted && !value.is_null() {
                    format!("\"{}\"", value.render())
                } else {
                    value.render()
                };
                format!("{}={}", fragment.field_name, rendered)
            })
            .collect();

        format!("{}{{{}}}", self.entity_name, parts.join(", "))
    }
}

/// Structural hash of a single value, wrapping 32-bit
fn value_hash(value: &Value) -> i32 {
    match value {
        Value::Null => 0,
        Value::Bool(v) => {
            if *v {
                1231
            } else {
                1237
            }
        }
        Value::Int(v) => {
            let bits = *v as u64;
            (bits ^ (bits >> 32)) as u32 as i32
        }
        Value::Float(v) => {
            let bits = v.to_bits();
            (bits ^ (bits >> 32)) as u32 as i32
        }
        Value::Str(v) => {
            let mut hash: i32 = 0;
            for byte in v.bytes() {
                hash = hash.wrapping_mul(31).wrapping_add(i32::from(byte));
            }
            hash
        }
        Value::Bytes(bytes) => {
            let mut hash: i32 = 1;
            for byte in bytes {
                hash = hash.wrapping_mul(31).wrapping_add(i32::from(*byte));
            }
            hash
        }
        Value::Array(elements) => {
            // Element-wise running accumulator, seeded at 1
            let mut hash: i32 = 1;
            for element in elements {
                hash = hash.wrapping_mul(31).wrapping_add(value_hash(element));
            }
            hash
        }
    }
}
