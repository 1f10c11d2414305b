//! Abstract API description model
//!
//! The assembler lowers a validated schema into these descriptors; a source
//! emitter turns them into persisted artifacts. The description is plain
//! data, serializable for snapshots and tooling.

use serde::Serialize;

use crate::error::Result;
use crate::plan::{ColumnRegistryPlan, KeyStagePlan, ValueSemanticsPlan};
use crate::schema::types::ValueType;

/// A field of the generated value object
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub versioned: bool,
}

/// A parameter of a generated method
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParamDescriptor {
    pub name: String,
    pub value_type: Option<ValueType>,
}

/// The role of a generated method
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MethodKind {
    Getter,
    Setter,
    TimestampGetter,
    TimestampSetter,
    TimestampedSetter,
    ColumnGetDispatch,
    ColumnSetDispatch,
    TimestampGetDispatch,
    TimestampSetDispatch,
    StageTransition,
    Build,
    Equality,
    Hash,
    Repr,
}

/// A method of a generated type
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MethodDescriptor {
    pub name: String,
    pub kind: MethodKind,
    pub params: Vec<ParamDescriptor>,
    /// Name of the returned type, if any
    pub returns: Option<String>,
}

/// The role of a generated type
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TypeKind {
    /// The entity value object
    EntityValue,
    /// One stage of the key builder chain
    KeyStage,
    /// The terminal builder exposing only `build()`
    KeyTerminal,
}

/// A generated nominal type
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: TypeKind,
    pub methods: Vec<MethodDescriptor>,
}

/// The registration statement the generated API performs once at load time
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegistrationDescriptor {
    pub entity_name: String,
    pub table_name: String,
    /// Column field names in declaration order
    pub columns: Vec<String>,
    /// Symbol of the generated factory function
    pub factory: String,
}

/// The complete abstract API description for one entity
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiDescription {
    pub entity_name: String,
    pub table_name: String,
    pub fields: Vec<FieldDescriptor>,
    pub types: Vec<TypeDescriptor>,
    pub key_plan: KeyStagePlan,
    pub column_plan: ColumnRegistryPlan,
    pub value_plan: ValueSemanticsPlan,
    pub registration: RegistrationDescriptor,
}

impl ApiDescription {
    /// Serialize the description to JSON
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };

        Ok(json)
    }
}
