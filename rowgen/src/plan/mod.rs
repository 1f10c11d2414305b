//! Planner module for rowgen
//!
//! Each planner is a pure function of a validated schema; there is no shared
//! state and no ordering dependency between them.

pub mod columns;
pub mod key;
pub mod value;

// Re-export key types
pub use columns::{plan_column_registry, ColumnId, ColumnMeta, ColumnRegistryPlan};
pub use key::{plan_key_stages, KeyBuilder, KeyStagePlan, RowKey, StageDescriptor, StageTransition};
pub use value::{plan_value_semantics, SemanticFragment, ValueSemanticsPlan};
