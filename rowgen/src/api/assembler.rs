//! API assembler
//!
//! This module merges the planner outputs and the entity's field
//! declarations into one abstract API description. It is a pure composition
//! step: planner failures propagate before any registration descriptor is
//! produced.

use crate::api::description::{
    ApiDescription, FieldDescriptor, MethodDescriptor, MethodKind, ParamDescriptor,
    RegistrationDescriptor, TypeDescriptor, TypeKind,
};
use crate::config::NamingConfig;
use crate::plan::{
    plan_column_registry, plan_key_stages, plan_value_semantics, KeyStagePlan, StageTransition,
};
use crate::schema::types::{EntitySchema, ValueType};
use crate::utils::naming;

/// Assemble the abstract API description for a validated schema
pub fn assemble(schema: &EntitySchema, naming_config: &NamingConfig) -> ApiDescription {
    let key_plan = plan_key_stages(schema, naming_config);
    let column_plan = plan_column_registry(schema);
    let value_plan = plan_value_semantics(schema);

    let fields = schema
        .columns
        .iter()
        .map(|column| FieldDescriptor {
            name: column.field_name.clone(),
            value_type: column.value_type.clone(),
            versioned: column.versioned,
        })
        .collect();

    let mut types = Vec::with_capacity(key_plan.stages.len() + 2);
    types.push(entity_type(schema, naming_config));
    types.extend(stage_types(&key_plan));
    types.push(terminal_type(&key_plan));

    let registration = RegistrationDescriptor {
        entity_name: schema.entity_name.clone(),
        table_name: schema.table_name.clone(),
        columns: schema
            .columns
            .iter()
            .map(|column| column.field_name.clone())
            .collect(),
        factory: format!(
            "new_{}",
            naming::apply_naming_convention(&schema.entity_name, "snake_case")
        ),
    };

    ApiDescription {
        entity_name: schema.entity_name.clone(),
        table_name: schema.table_name.clone(),
        fields,
        types,
        key_plan,
        column_plan,
        value_plan,
        registration,
    }
}

/// The entity value object: accessors, dispatch methods and value semantics
fn entity_type(schema: &EntitySchema, naming_config: &NamingConfig) -> TypeDescriptor {
    let mut methods = Vec::new();

    for column in &schema.columns {
        let field = &column.field_name;

        methods.push(MethodDescriptor {
            name: naming::getter_name(naming_config, field),
            kind: MethodKind::Getter,
            params: vec![],
            returns: Some(column.value_type.to_string()),
        });
        methods.push(MethodDescriptor {
            name: naming::setter_name(naming_config, field),
            kind: MethodKind::Setter,
            params: vec![value_param(&column.value_type)],
            returns: None,
        });

        if column.versioned {
            methods.push(MethodDescriptor {
                name: naming::timestamped_setter_name(naming_config, field),
                kind: MethodKind::TimestampedSetter,
                params: vec![value_param(&column.value_type), timestamp_param()],
                returns: None,
            });
            methods.push(MethodDescriptor {
                name: naming::timestamp_getter_name(naming_config, field),
                kind: MethodKind::TimestampGetter,
                params: vec![],
                returns: Some("timestamp".to_string()),
            });
            methods.push(MethodDescriptor {
                name: naming::timestamp_setter_name(naming_config, field),
                kind: MethodKind::TimestampSetter,
                params: vec![timestamp_param()],
                returns: None,
            });
        }
    }

    // Dynamic dispatch entry points, keyed by column identity
    methods.push(dispatch_method("get_column_value", MethodKind::ColumnGetDispatch));
    methods.push(dispatch_method("set_column_value", MethodKind::ColumnSetDispatch));
    methods.push(dispatch_method(
        "get_column_timestamp",
        MethodKind::TimestampGetDispatch,
    ));
    methods.push(dispatch_method(
        "set_column_timestamp",
        MethodKind::TimestampSetDispatch,
    ));

    methods.push(MethodDescriptor {
        name: "equals".to_string(),
        kind: MethodKind::Equality,
        params: vec![ParamDescriptor {
            name: "other".to_string(),
            value_type: None,
        }],
        returns: Some("bool".to_string()),
    });
    methods.push(MethodDescriptor {
        name: "hash_code".to_string(),
        kind: MethodKind::Hash,
        params: vec![],
        returns: Some("int".to_string()),
    });
    methods.push(MethodDescriptor {
        name: "to_string".to_string(),
        kind: MethodKind::Repr,
        params: vec![],
        returns: Some("string".to_string()),
    });

    TypeDescriptor {
        name: naming::apply_naming_convention(&schema.entity_name, &naming_config.type_style),
        kind: TypeKind::EntityValue,
        methods,
    }
}

/// One nominal type per builder stage, each with its single transition
fn stage_types(key_plan: &KeyStagePlan) -> Vec<TypeDescriptor> {
    key_plan
        .stages
        .iter()
        .map(|stage| {
            let returns = match stage.next {
                StageTransition::Stage(next) => key_plan.stages[next].type_name.clone(),
                StageTransition::Terminal => key_plan.terminal_type_name.clone(),
            };

            TypeDescriptor {
                name: stage.type_name.clone(),
                kind: TypeKind::KeyStage,
                methods: vec![MethodDescriptor {
                    name: stage.method_name.clone(),
                    kind: MethodKind::StageTransition,
                    params: vec![ParamDescriptor {
                        name: stage.component_name.clone(),
                        value_type: Some(stage.value_type.clone()),
                    }],
                    returns: Some(returns),
                }],
            }
        })
        .collect()
}

fn terminal_type(key_plan: &KeyStagePlan) -> TypeDescriptor {
    TypeDescriptor {
        name: key_plan.terminal_type_name.clone(),
        kind: TypeKind::KeyTerminal,
        methods: vec![MethodDescriptor {
            name: "build".to_string(),
            kind: MethodKind::Build,
            params: vec![],
            returns: Some("row_key".to_string()),
        }],
    }
}

fn dispatch_method(name: &str, kind: MethodKind) -> MethodDescriptor {
    let mut params = vec![ParamDescriptor {
        name: "column_id".to_string(),
        value_type: None,
    }];
    let mut returns = None;

    match kind {
        MethodKind::ColumnSetDispatch => params.push(ParamDescriptor {
            name: "value".to_string(),
            value_type: None,
        }),
        MethodKind::TimestampSetDispatch => params.push(timestamp_param()),
        MethodKind::ColumnGetDispatch => returns = Some("value".to_string()),
        MethodKind::TimestampGetDispatch => returns = Some("timestamp".to_string()),
        _ => {}
    }

    MethodDescriptor {
        name: name.to_string(),
        kind,
        params,
        returns,
    }
}

fn value_param(value_type: &ValueType) -> ParamDescriptor {
    ParamDescriptor {
        name: "value".to_string(),
        value_type: Some(value_type.clone()),
    }
}

fn timestamp_param() -> ParamDescriptor {
    ParamDescriptor {
        name: "timestamp".to_string(),
        value_type: Some(ValueType::Int),
    }
}
