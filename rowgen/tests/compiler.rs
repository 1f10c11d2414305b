//! Compiler tests: validation, key-stage planning and API assembly

use pretty_assertions::assert_eq;
use rstest::*;

use rowgen::api::{MethodKind, TypeKind};
use rowgen::config::{Config, NamingConfig, OutputConfig};
use rowgen::plan::StageTransition;
use rowgen::{
    CandidateSchema, ColumnSpec, DiagnosticKind, Error, KeyComponentSpec, MemoryEmitter,
    RowGenClient, SchemaElement, ValueType,
};

/// Shared fixture: a user entity with a quoted name and a tag array
fn user_candidate() -> CandidateSchema {
    CandidateSchema::new("User", "users")
        .key_component(KeyComponentSpec::constant("user"))
        .key_component(KeyComponentSpec::dynamic("id", ValueType::Str))
        .column(ColumnSpec::new("displayName", "meta", ValueType::Str).qualifier("name"))
        .column(ColumnSpec::new(
            "tags",
            "meta",
            ValueType::Array(Box::new(ValueType::Str)),
        ))
}

fn client() -> RowGenClient {
    RowGenClient::with_defaults()
}

#[test]
fn valid_schema_compiles() {
    let description = client().compile_entity(&user_candidate()).unwrap();

    assert_eq!(description.entity_name, "User");
    assert_eq!(description.table_name, "users");
    assert_eq!(description.key_plan.delimiter, "::");
    assert_eq!(description.fields.len(), 2);
}

#[test]
fn duplicate_column_coordinate_is_rejected() {
    let candidate = user_candidate().column(
        ColumnSpec::new("alias", "meta", ValueType::Str).qualifier("name"),
    );

    let error = client().compile_entity(&candidate).unwrap_err();
    let diagnostics = error.diagnostics().expect("expected validation failure");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::DuplicateColumn);
    // Attributed to the offending field, not the entity
    assert_eq!(
        diagnostics[0].element,
        SchemaElement::ColumnField("alias".to_string())
    );
}

#[test]
fn same_qualifier_under_different_family_is_accepted() {
    let candidate = user_candidate().column(
        ColumnSpec::new("altName", "extra", ValueType::Str).qualifier("name"),
    );

    assert!(client().compile_entity(&candidate).is_ok());
}

#[rstest]
#[case::no_columns(
    CandidateSchema::new("Empty", "empties")
        .key_component(KeyComponentSpec::constant("e")),
    DiagnosticKind::NoColumns
)]
#[case::no_key_components(
    CandidateSchema::new("Keyless", "keyless")
        .column(ColumnSpec::new("a", "f", ValueType::Int)),
    DiagnosticKind::NoKeyComponents
)]
#[case::missing_table_name(
    CandidateSchema::new("NoTable", "")
        .key_component(KeyComponentSpec::constant("t"))
        .column(ColumnSpec::new("a", "f", ValueType::Int)),
    DiagnosticKind::MissingTableName
)]
#[case::empty_constant(
    CandidateSchema::new("BadKey", "bad_keys")
        .key_component(KeyComponentSpec::constant(""))
        .column(ColumnSpec::new("a", "f", ValueType::Int)),
    DiagnosticKind::MalformedKeyComponent
)]
#[case::empty_dynamic_name(
    CandidateSchema::new("BadKey", "bad_keys")
        .key_component(KeyComponentSpec::dynamic("", ValueType::Str))
        .column(ColumnSpec::new("a", "f", ValueType::Int)),
    DiagnosticKind::MalformedKeyComponent
)]
#[case::duplicate_dynamic_name(
    CandidateSchema::new("BadKey", "bad_keys")
        .key_component(KeyComponentSpec::dynamic("id", ValueType::Str))
        .key_component(KeyComponentSpec::dynamic("id", ValueType::Int))
        .column(ColumnSpec::new("a", "f", ValueType::Int)),
    DiagnosticKind::DuplicateKeyComponent
)]
#[case::immutable_column(
    CandidateSchema::new("Frozen", "frozen")
        .key_component(KeyComponentSpec::constant("f"))
        .column(ColumnSpec::new("a", "f", ValueType::Int).immutable()),
    DiagnosticKind::ImmutableColumn
)]
#[case::shared_column(
    CandidateSchema::new("Shared", "shared")
        .key_component(KeyComponentSpec::constant("s"))
        .column(ColumnSpec::new("a", "f", ValueType::Int).shared()),
    DiagnosticKind::SharedColumn
)]
fn schema_violation_is_reported(
    #[case] candidate: CandidateSchema,
    #[case] expected: DiagnosticKind,
) {
    let error = client().compile_entity(&candidate).unwrap_err();
    let diagnostics = error.diagnostics().expect("expected validation failure");

    assert!(
        diagnostics.iter().any(|d| d.kind == expected),
        "expected {:?} among {:?}",
        expected,
        diagnostics
    );
}

#[test]
fn structural_violations_attribute_to_container_and_entity() {
    let mut candidate = user_candidate();
    candidate.owner_public = true;
    candidate.publicly_constructible = true;
    candidate.static_entity = true;

    let error = client().compile_entity(&candidate).unwrap_err();
    let diagnostics = error.diagnostics().unwrap();

    let kinds: Vec<DiagnosticKind> = diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::PublicOwner,
            DiagnosticKind::PubliclyConstructible,
            DiagnosticKind::StaticEntity,
        ]
    );
    assert_eq!(
        diagnostics[0].element,
        SchemaElement::Container("User".to_string())
    );
    assert_eq!(
        diagnostics[1].element,
        SchemaElement::Entity("User".to_string())
    );
}

#[test]
fn all_violations_are_collected_in_one_pass() {
    let candidate = CandidateSchema::new("Broken", "")
        .key_component(KeyComponentSpec::constant(""))
        .column(ColumnSpec::new("a", "f", ValueType::Int).immutable())
        .column(ColumnSpec::new("a", "f", ValueType::Int));

    let error = client().compile_entity(&candidate).unwrap_err();
    let diagnostics = error.diagnostics().unwrap();

    // Missing table name, immutable column, duplicate coordinate, duplicate
    // field and malformed key component, all in one report
    assert!(diagnostics.len() >= 5, "got {:?}", diagnostics);
}

#[test]
fn fail_fast_truncates_to_first_diagnostic() {
    let mut config = Config::default();
    config.compiler.fail_fast = true;
    let client = RowGenClient::new(config);

    let candidate = CandidateSchema::new("Broken", "")
        .key_component(KeyComponentSpec::constant(""))
        .column(ColumnSpec::new("a", "f", ValueType::Int).immutable());

    let error = client.compile_entity(&candidate).unwrap_err();
    assert_eq!(error.diagnostics().unwrap().len(), 1);
}

#[test]
fn key_plan_has_one_stage_per_dynamic_component() {
    let candidate = CandidateSchema::new("Span", "spans")
        .key_component(KeyComponentSpec::constant("span"))
        .key_component(KeyComponentSpec::dynamic("traceId", ValueType::Str))
        .key_component(KeyComponentSpec::dynamic("spanId", ValueType::Int))
        .column(ColumnSpec::new("name", "s", ValueType::Str));

    let description = client().compile_entity(&candidate).unwrap();
    let plan = &description.key_plan;

    assert_eq!(plan.stages.len(), 2);
    assert_eq!(plan.stages[0].component_name, "traceId");
    assert_eq!(plan.stages[0].type_name, "SpanKeyBuilderTraceId");
    assert_eq!(plan.stages[0].next, StageTransition::Stage(1));
    assert_eq!(plan.stages[1].component_name, "spanId");
    assert_eq!(plan.stages[1].next, StageTransition::Terminal);
    assert_eq!(plan.terminal_type_name, "SpanKeyReady");
}

#[test]
fn all_constant_key_format_collapses_to_terminal_only() {
    let candidate = CandidateSchema::new("Singleton", "singletons")
        .key_component(KeyComponentSpec::constant("the"))
        .key_component(KeyComponentSpec::constant("one"))
        .column(ColumnSpec::new("payload", "p", ValueType::Bytes));

    let description = client().compile_entity(&candidate).unwrap();

    assert!(description.key_plan.stages.is_empty());

    let stage_types: Vec<_> = description
        .types
        .iter()
        .filter(|t| t.kind == TypeKind::KeyStage)
        .collect();
    assert!(stage_types.is_empty());

    let terminal = description
        .types
        .iter()
        .find(|t| t.kind == TypeKind::KeyTerminal)
        .unwrap();
    assert_eq!(terminal.methods.len(), 1);
    assert_eq!(terminal.methods[0].name, "build");
}

#[test]
fn assembled_entity_type_exposes_accessors_and_dispatch() {
    let candidate = CandidateSchema::new("Doc", "docs")
        .key_component(KeyComponentSpec::dynamic("id", ValueType::Str))
        .column(ColumnSpec::new("body", "d", ValueType::Str).versioned(true))
        .column(ColumnSpec::new("size", "d", ValueType::Int));

    let description = client().compile_entity(&candidate).unwrap();
    let entity = description
        .types
        .iter()
        .find(|t| t.kind == TypeKind::EntityValue)
        .unwrap();

    let names: Vec<&str> = entity.methods.iter().map(|m| m.name.as_str()).collect();
    assert!(names.contains(&"body"));
    assert!(names.contains(&"set_body"));
    assert!(names.contains(&"set_body_with_timestamp"));
    assert!(names.contains(&"body_timestamp"));
    assert!(names.contains(&"set_body_timestamp"));
    assert!(names.contains(&"set_size"));
    assert!(names.contains(&"get_column_value"));
    assert!(names.contains(&"set_column_value"));
    assert!(names.contains(&"get_column_timestamp"));
    assert!(names.contains(&"set_column_timestamp"));

    // Non-versioned columns get no timestamp accessors
    assert!(!names.contains(&"set_size_with_timestamp"));

    let equality = entity
        .methods
        .iter()
        .find(|m| m.kind == MethodKind::Equality)
        .unwrap();
    assert_eq!(equality.name, "equals");
}

#[test]
fn registration_descriptor_lists_columns_in_declared_order() {
    let description = client().compile_entity(&user_candidate()).unwrap();

    assert_eq!(description.registration.table_name, "users");
    assert_eq!(
        description.registration.columns,
        vec!["displayName".to_string(), "tags".to_string()]
    );
    assert_eq!(description.registration.factory, "new_user");
}

#[test]
fn sibling_entities_compile_independently() {
    let good = user_candidate();
    let bad = CandidateSchema::new("Broken", "")
        .key_component(KeyComponentSpec::constant("b"))
        .column(ColumnSpec::new("a", "f", ValueType::Int));

    let report = client().compile_all(&[bad, good]);

    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.succeeded[0].entity_name, "User");
    assert_eq!(report.failed[0].0, "Broken");
    assert!(!report.is_clean());
}

#[test]
fn custom_naming_patterns_apply_to_stage_types() {
    let mut config = Config::default();
    config.naming = NamingConfig {
        stage_pattern: "{entity}With{component}".to_string(),
        terminal_pattern: "{entity}Complete".to_string(),
        ..NamingConfig::default()
    };
    let client = RowGenClient::new(config);

    let description = client.compile_entity(&user_candidate()).unwrap();

    assert_eq!(description.key_plan.stages[0].type_name, "UserWithId");
    assert_eq!(description.key_plan.terminal_type_name, "UserComplete");
}

#[test]
fn config_loads_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rowgen.toml");
    std::fs::write(
        &path,
        r#"
        [compiler]
        fail_fast = true
        default_key_delimiter = "|"

        [naming]
        stage_pattern = "{entity}Stage{component}"
        "#,
    )
    .unwrap();

    let config = rowgen::config::load_from_file(path.to_str().unwrap()).unwrap();

    assert!(config.compiler.fail_fast);
    assert_eq!(config.compiler.default_key_delimiter, "|");
    assert_eq!(config.naming.stage_pattern, "{entity}Stage{component}");
    // Unspecified fields fall back to defaults
    assert_eq!(config.naming.terminal_pattern, "{entity}KeyReady");
}

#[test]
fn missing_config_file_is_a_config_error() {
    let error = rowgen::config::load_from_file("/nonexistent/rowgen.toml").unwrap_err();
    assert!(matches!(error, Error::ConfigError(_)));
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rowgen.toml");
    std::fs::write(&path, "[compiler\nfail_fast = true").unwrap();

    let error = rowgen::config::load_from_file(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(error, Error::ConfigError(_)));
}

#[test]
fn configured_output_directory_receives_emitted_descriptions() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output = Some(OutputConfig {
        directory: dir.path().to_str().unwrap().to_string(),
        pretty: false,
    });
    let client = RowGenClient::new(config);

    let description = client.compile_entity(&user_candidate()).unwrap();
    let mut emitter = client.output_emitter().expect("output is configured");
    client.emit_all(&mut emitter, &[description]).unwrap();

    assert!(dir.path().join("User.json").exists());
}

#[test]
fn no_output_config_yields_no_emitter() {
    assert!(client().output_emitter().is_none());
}

#[test]
fn descriptions_round_trip_through_emitters() {
    let client = client();
    let description = client.compile_entity(&user_candidate()).unwrap();

    let mut memory = MemoryEmitter::new();
    client.emit_all(&mut memory, &[description.clone()]).unwrap();
    assert_eq!(memory.emitted.len(), 1);
    assert_eq!(memory.emitted[0], description);

    let dir = tempfile::tempdir().unwrap();
    let mut files = rowgen::JsonFileEmitter::new(dir.path(), true);
    client.emit_all(&mut files, &[description]).unwrap();

    let written = std::fs::read_to_string(dir.path().join("User.json")).unwrap();
    assert!(written.contains("\"entity_name\": \"User\""));
}
