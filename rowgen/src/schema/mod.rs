//! Schema module for rowgen
//!
//! This module holds the entity schema model and the validator that turns
//! candidate schemas into validated, immutable ones.

pub mod types;
pub mod validator;

// Re-export key types
pub use types::{
    CandidateSchema, ColumnSpec, EntitySchema, KeyComponentSpec, SourceLocation, Value,
    ValueType, DEFAULT_KEY_DELIMITER,
};
pub use validator::validate;
