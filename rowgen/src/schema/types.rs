//! Type definitions for entity schema objects

use serde::{Deserialize, Serialize};

/// Default delimiter joining row-key components
pub const DEFAULT_KEY_DELIMITER: &str = "::";

/// The storage-level type of a column or key component value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Array(Box<ValueType>),
}

impl ValueType {
    /// Whether this type carries element-wise (array) semantics
    pub fn is_array(&self) -> bool {
        matches!(self, ValueType::Array(_))
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Str => write!(f, "string"),
            ValueType::Bytes => write!(f, "bytes"),
            ValueType::Array(element) => write!(f, "array<{}>", element),
        }
    }
}

/// A runtime value held by an entity field or supplied to a key builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
}

/// Floats compare by bit pattern so equality stays consistent with the
/// bit-based hash: NaN equals itself, and 0.0 and -0.0 are distinct.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Whether this is the absent value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check the value against a declared type
    ///
    /// Null matches any type: absence is representable for every column.
    pub fn matches(&self, ty: &ValueType) -> bool {
        match (self, ty) {
            (Value::Null, _) => true,
            (Value::Bool(_), ValueType::Bool) => true,
            (Value::Int(_), ValueType::Int) => true,
            (Value::Float(_), ValueType::Float) => true,
            (Value::Str(_), ValueType::Str) => true,
            (Value::Bytes(_), ValueType::Bytes) => true,
            (Value::Array(elements), ValueType::Array(element_ty)) => {
                elements.iter().all(|e| e.matches(element_ty))
            }
            _ => false,
        }
    }

    /// Default textual conversion, used for key building and rendering
    pub fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Str(v) => v.clone(),
            Value::Bytes(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
                format!("0x{}", hex)
            }
            Value::Array(elements) => {
                let rendered: Vec<String> = elements.iter().map(Value::render).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }
}

/// Source location metadata used to attribute diagnostics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

/// One segment of a composite row key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum KeyComponentSpec {
    /// A fixed literal token, folded into the key as-is
    Constant { value: String },
    /// A component supplied at construction time, in declaration order
    Dynamic { name: String, value_type: ValueType },
}

impl KeyComponentSpec {
    /// Create a constant component
    pub fn constant(value: &str) -> Self {
        KeyComponentSpec::Constant {
            value: value.to_string(),
        }
    }

    /// Create a dynamic component
    pub fn dynamic(name: &str, value_type: ValueType) -> Self {
        KeyComponentSpec::Dynamic {
            name: name.to_string(),
            value_type,
        }
    }
}

/// A typed, optionally versioned field mapped to a (family, qualifier) coordinate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnSpec {
    pub field_name: String,
    pub family: String,
    /// Storage qualifier; defaults to the field name when absent
    pub qualifier: Option<String>,
    pub value_type: ValueType,
    pub versioned: bool,
    /// Whether the field is writable at the storage level
    pub mutable: bool,
    /// Whether the field is shared across instances
    pub shared: bool,
}

impl ColumnSpec {
    /// Create a new column with the given field name, family and type
    pub fn new(field_name: &str, family: &str, value_type: ValueType) -> Self {
        Self {
            field_name: field_name.to_string(),
            family: family.to_string(),
            qualifier: None,
            value_type,
            versioned: false,
            mutable: true,
            shared: false,
        }
    }

    /// Set an explicit storage qualifier
    pub fn qualifier(mut self, qualifier: &str) -> Self {
        self.qualifier = Some(qualifier.to_string());
        self
    }

    /// Mark the column as versioned (writes carry a timestamp)
    pub fn versioned(mut self, versioned: bool) -> Self {
        self.versioned = versioned;
        self
    }

    /// Mark the column as read-only at the storage level
    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    /// Mark the column as shared across instances
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    /// The effective storage qualifier
    pub fn resolved_qualifier(&self) -> &str {
        self.qualifier.as_deref().unwrap_or(&self.field_name)
    }
}

/// An unvalidated entity schema, as supplied by the discovery collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateSchema {
    pub entity_name: String,
    pub table_name: String,
    /// Whether the owning container is publicly visible
    pub owner_public: bool,
    /// Whether the entity can be constructed outside its container
    pub publicly_constructible: bool,
    /// Whether the entity is declared static/shared
    pub static_entity: bool,
    pub key_delimiter: Option<String>,
    pub key_format: Vec<KeyComponentSpec>,
    pub columns: Vec<ColumnSpec>,
    pub location: Option<SourceLocation>,
}

impl CandidateSchema {
    /// Create a new candidate schema with the given entity and table names
    pub fn new(entity_name: &str, table_name: &str) -> Self {
        Self {
            entity_name: entity_name.to_string(),
            table_name: table_name.to_string(),
            owner_public: false,
            publicly_constructible: false,
            static_entity: false,
            key_delimiter: None,
            key_format: Vec::new(),
            columns: Vec::new(),
            location: None,
        }
    }

    /// Append a key component, preserving declaration order
    pub fn key_component(mut self, component: KeyComponentSpec) -> Self {
        self.key_format.push(component);
        self
    }

    /// Append a column, preserving declaration order
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Override the key delimiter
    pub fn key_delimiter(mut self, delimiter: &str) -> Self {
        self.key_delimiter = Some(delimiter.to_string());
        self
    }

    /// Attach source location metadata for diagnostics
    pub fn located(mut self, file: &str, line: u32) -> Self {
        self.location = Some(SourceLocation {
            file: file.to_string(),
            line,
        });
        self
    }
}

/// A validated, immutable entity schema
///
/// Only the validator constructs these; column and key component order is the
/// declaration order and defines enumeration and hash combination order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntitySchema {
    pub entity_name: String,
    pub table_name: String,
    pub key_delimiter: String,
    pub key_format: Vec<KeyComponentSpec>,
    pub columns: Vec<ColumnSpec>,
}

impl EntitySchema {
    /// Iterate the dynamic key components in declaration order
    pub fn dynamic_key_components(&self) -> impl Iterator<Item = (&str, &ValueType)> {
        self.key_format.iter().filter_map(|component| match component {
            KeyComponentSpec::Dynamic { name, value_type } => {
                Some((name.as_str(), value_type))
            }
            KeyComponentSpec::Constant { .. } => None,
        })
    }

    /// Look up a column by field name
    pub fn column(&self, field_name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.field_name == field_name)
    }
}
