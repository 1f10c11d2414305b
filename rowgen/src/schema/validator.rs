//! Schema validator
//!
//! This module checks a candidate schema against the structural and naming
//! invariants and produces either a validated schema or a list of
//! diagnostics, each attributed to the offending element.

use std::collections::HashSet;

use crate::error::{Diagnostic, DiagnosticKind, SchemaElement};
use crate::schema::types::{
    CandidateSchema, ColumnSpec, EntitySchema, KeyComponentSpec, DEFAULT_KEY_DELIMITER,
};

/// Validate a candidate schema, collecting every violation in one pass
pub fn validate(candidate: &CandidateSchema) -> Result<EntitySchema, Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    check_container(candidate, &mut diagnostics);
    check_entity(candidate, &mut diagnostics);
    check_columns(&candidate.entity_name, &candidate.columns, &mut diagnostics);
    check_key_format(&candidate.entity_name, &candidate.key_format, &mut diagnostics);

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    Ok(EntitySchema {
        entity_name: candidate.entity_name.clone(),
        table_name: candidate.table_name.clone(),
        key_delimiter: candidate
            .key_delimiter
            .clone()
            .unwrap_or_else(|| DEFAULT_KEY_DELIMITER.to_string()),
        key_format: candidate.key_format.clone(),
        columns: candidate.columns.clone(),
    })
}

/// The owning container must be non-public and carry a non-empty table name
fn check_container(candidate: &CandidateSchema, diagnostics: &mut Vec<Diagnostic>) {
    if candidate.owner_public {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::PublicOwner,
            SchemaElement::Container(candidate.entity_name.clone()),
            "owning container must not be publicly visible",
        ));
    }

    if candidate.table_name.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::MissingTableName,
            SchemaElement::Container(candidate.entity_name.clone()),
            "table name must be non-empty",
        ));
    }
}

/// Exactly one logical instance context per entity, never externally instantiated
fn check_entity(candidate: &CandidateSchema, diagnostics: &mut Vec<Diagnostic>) {
    if candidate.publicly_constructible {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::PubliclyConstructible,
            SchemaElement::Entity(candidate.entity_name.clone()),
            "entity must not be publicly constructible",
        ));
    }

    if candidate.static_entity {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::StaticEntity,
            SchemaElement::Entity(candidate.entity_name.clone()),
            "entity must not be static",
        ));
    }
}

fn check_columns(entity_name: &str, columns: &[ColumnSpec], diagnostics: &mut Vec<Diagnostic>) {
    if columns.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::NoColumns,
            SchemaElement::Entity(entity_name.to_string()),
            "at least one column is required",
        ));
        return;
    }

    let mut seen_coordinates: HashSet<(String, String)> = HashSet::new();
    let mut seen_fields: HashSet<&str> = HashSet::new();

    for column in columns {
        let element = SchemaElement::ColumnField(column.field_name.clone());

        if !column.mutable {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::ImmutableColumn,
                element.clone(),
                format!("column field `{}` must be mutable", column.field_name),
            ));
        }

        if column.shared {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::SharedColumn,
                element.clone(),
                format!(
                    "column field `{}` must not be shared across instances",
                    column.field_name
                ),
            ));
        }

        if column.family.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::EmptyFamily,
                element.clone(),
                format!("column field `{}` has an empty family", column.field_name),
            ));
        }

        // (family, qualifier) identifies the column in storage; the pair must
        // be unique, the qualifier alone need not be
        let coordinate = (
            column.family.clone(),
            column.resolved_qualifier().to_string(),
        );
        if !seen_coordinates.insert(coordinate) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateColumn,
                element.clone(),
                format!(
                    "duplicate column ({}, {}) on field `{}`",
                    column.family,
                    column.resolved_qualifier(),
                    column.field_name
                ),
            ));
        }

        if !seen_fields.insert(&column.field_name) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateField,
                element,
                format!("duplicate field name `{}`", column.field_name),
            ));
        }
    }
}

fn check_key_format(
    entity_name: &str,
    key_format: &[KeyComponentSpec],
    diagnostics: &mut Vec<Diagnostic>,
) {
    if key_format.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::NoKeyComponents,
            SchemaElement::Entity(entity_name.to_string()),
            "at least one key component is required",
        ));
        return;
    }

    let mut seen_names: HashSet<&str> = HashSet::new();

    for (index, component) in key_format.iter().enumerate() {
        match component {
            KeyComponentSpec::Constant { value } => {
                if value.is_empty() {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MalformedKeyComponent,
                        SchemaElement::KeyComponent(index),
                        "constant key component requires a non-empty value",
                    ));
                }
            }
            KeyComponentSpec::Dynamic { name, .. } => {
                if name.is_empty() {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MalformedKeyComponent,
                        SchemaElement::KeyComponent(index),
                        "dynamic key component requires a non-empty name",
                    ));
                } else if !seen_names.insert(name) {
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::DuplicateKeyComponent,
                        SchemaElement::KeyComponent(index),
                        format!("duplicate dynamic key component name `{}`", name),
                    ));
                }
            }
        }
    }
}
