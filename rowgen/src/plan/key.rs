//! Key-stage planner
//!
//! This module lowers a schema's key format into a chain of builder stages,
//! one per dynamic component, enforcing that components are supplied in
//! declaration order and that no key can be built before all of them are.

use serde::Serialize;

use crate::config::NamingConfig;
use crate::error::{Error, Result};
use crate::schema::types::{EntitySchema, KeyComponentSpec, Value, ValueType};
use crate::utils::naming;

/// Successor of a builder stage
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum StageTransition {
    /// Index of the next stage in the chain
    Stage(usize),
    /// The terminal builder, exposing only `build()`
    Terminal,
}

/// One stage of the generated key builder chain
///
/// A stage exposes exactly one operation, named after its dynamic component,
/// taking the component's declared type and returning the successor.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StageDescriptor {
    pub component_name: String,
    pub value_type: ValueType,
    pub type_name: String,
    pub method_name: String,
    pub next: StageTransition,
}

/// The planned key builder chain for one entity
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeyStagePlan {
    pub entity_name: String,
    pub delimiter: String,
    /// Full key format in declared order, constants included
    pub components: Vec<KeyComponentSpec>,
    /// One stage per dynamic component; empty for all-constant key formats
    pub stages: Vec<StageDescriptor>,
    pub terminal_type_name: String,
}

/// Plan the key builder chain for a validated schema
pub fn plan_key_stages(schema: &EntitySchema, naming_config: &NamingConfig) -> KeyStagePlan {
    let dynamic: Vec<(&str, &ValueType)> = schema.dynamic_key_components().collect();
    let count = dynamic.len();

    let stages = dynamic
        .iter()
        .enumerate()
        .map(|(index, (name, value_type))| StageDescriptor {
            component_name: name.to_string(),
            value_type: (*value_type).clone(),
            type_name: naming::stage_type_name(naming_config, &schema.entity_name, name),
            method_name: naming::stage_method_name(naming_config, name),
            next: if index + 1 < count {
                StageTransition::Stage(index + 1)
            } else {
                StageTransition::Terminal
            },
        })
        .collect();

    KeyStagePlan {
        entity_name: schema.entity_name.clone(),
        delimiter: schema.key_delimiter.clone(),
        components: schema.key_format.clone(),
        stages,
        terminal_type_name: naming::terminal_type_name(naming_config, &schema.entity_name),
    }
}

/// An opaque row key wrapping the joined component string
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct RowKey(String);

impl RowKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Staged key builder over a key plan
///
/// Components must be supplied in declaration order; `build()` is rejected
/// until every dynamic component has been supplied. This is the runtime
/// enforcement of the chain the stage descriptors describe nominally.
#[derive(Debug)]
pub struct KeyBuilder<'a> {
    plan: &'a KeyStagePlan,
    supplied: Vec<Value>,
}

impl<'a> KeyBuilder<'a> {
    /// Start a new builder at the first stage of the plan
    pub fn new(plan: &'a KeyStagePlan) -> Self {
        Self {
            plan,
            supplied: Vec::with_capacity(plan.stages.len()),
        }
    }

    /// Supply the value for the current stage's component
    pub fn supply(mut self, component_name: &str, value: Value) -> Result<Self> {
        let stage = self.plan.stages.get(self.supplied.len()).ok_or_else(|| {
            Error::KeyBuilderError(format!(
                "all {} key components already supplied",
                self.plan.stages.len()
            ))
        })?;

        if stage.component_name != component_name {
            return Err(Error::KeyBuilderError(format!(
                "expected component `{}`, got `{}`",
                stage.component_name, component_name
            )));
        }

        // Null is a builder-chain misuse, not a recoverable state
        if value.is_null() {
            return Err(Error::KeyBuilderError(format!(
                "null value supplied for key component `{}`",
                component_name
            )));
        }

        if !value.matches(&stage.value_type) {
            return Err(Error::KeyBuilderError(format!(
                "component `{}` expects type {}",
                component_name, stage.value_type
            )));
        }

        self.supplied.push(value);
        Ok(self)
    }

    /// Whether every dynamic component has been supplied
    pub fn is_complete(&self) -> bool {
        self.supplied.len() == self.plan.stages.len()
    }

    /// Join all components in declared order into an opaque row key
    pub fn build(self) -> Result<RowKey> {
        if !self.is_complete() {
            return Err(Error::KeyBuilderError(format!(
                "cannot build key: {} of {} components supplied",
                self.supplied.len(),
                self.plan.stages.len()
            )));
        }

        let mut parts = Vec::with_capacity(self.plan.components.len());
        let mut dynamic_index = 0;

        for component in &self.plan.components {
            match component {
                KeyComponentSpec::Constant { value } => parts.push(value.clone()),
                KeyComponentSpec::Dynamic { .. } => {
                    parts.push(self.supplied[dynamic_index].render());
                    dynamic_index += 1;
                }
            }
        }

        Ok(RowKey(parts.join(&self.plan.delimiter)))
    }
}
