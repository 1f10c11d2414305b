//! Naming utilities for rowgen
//!
//! This module derives the identifiers used in generated API descriptions:
//! stage type names, accessor method names and sanitized identifiers.

use inflector::Inflector;

use crate::config::NamingConfig;

/// Apply a naming convention to a string
pub fn apply_naming_convention(name: &str, convention: &str) -> String {
    match convention {
        "snake_case" => name.to_snake_case(),
        "camel_case" => name.to_camel_case(),
        "pascal_case" => name.to_pascal_case(),
        "screaming_snake_case" => name.to_screaming_snake_case(),
        _ => name.to_string(), // Default: keep as is
    }
}

/// Format a name according to a pattern with placeholders
pub fn format_name(pattern: &str, replacements: &[(&str, &str)]) -> String {
    let mut result = pattern.to_string();

    for (placeholder, value) in replacements {
        result = result.replace(&format!("{{{}}}", placeholder), value);
    }

    result
}

/// Name of the generated stage type for a dynamic key component
pub fn stage_type_name(naming: &NamingConfig, entity_name: &str, component_name: &str) -> String {
    let entity = apply_naming_convention(entity_name, &naming.type_style);
    let component = apply_naming_convention(component_name, &naming.type_style);

    format_name(
        &naming.stage_pattern,
        &[("entity", &entity), ("component", &component)],
    )
}

/// Name of the generated terminal builder type
pub fn terminal_type_name(naming: &NamingConfig, entity_name: &str) -> String {
    let entity = apply_naming_convention(entity_name, &naming.type_style);

    format_name(&naming.terminal_pattern, &[("entity", &entity)])
}

/// Name of the stage transition method for a dynamic key component
pub fn stage_method_name(naming: &NamingConfig, component_name: &str) -> String {
    apply_naming_convention(component_name, &naming.method_style)
}

/// Name of the generated getter for a column field
pub fn getter_name(naming: &NamingConfig, field_name: &str) -> String {
    apply_naming_convention(field_name, &naming.method_style)
}

/// Name of the generated setter for a column field
pub fn setter_name(naming: &NamingConfig, field_name: &str) -> String {
    format!(
        "set_{}",
        apply_naming_convention(field_name, &naming.method_style)
    )
}

/// Name of the timestamp getter for a versioned column field
pub fn timestamp_getter_name(naming: &NamingConfig, field_name: &str) -> String {
    format!(
        "{}_timestamp",
        apply_naming_convention(field_name, &naming.method_style)
    )
}

/// Name of the timestamp setter for a versioned column field
pub fn timestamp_setter_name(naming: &NamingConfig, field_name: &str) -> String {
    format!(
        "set_{}_timestamp",
        apply_naming_convention(field_name, &naming.method_style)
    )
}

/// Name of the timestamp-qualified setter for a versioned column field
pub fn timestamped_setter_name(naming: &NamingConfig, field_name: &str) -> String {
    format!(
        "set_{}_with_timestamp",
        apply_naming_convention(field_name, &naming.method_style)
    )
}

/// Sanitize identifiers for generated code
pub fn sanitize_identifier(name: &str) -> String {
    // Remove or replace characters not allowed in identifiers
    let mut sanitized = name.replace(|c: char| !c.is_alphanumeric() && c != '_', "_");

    // Ensure identifier doesn't start with a number
    if sanitized.chars().next().map_or(false, |c| c.is_numeric()) {
        sanitized = format!("_{}", sanitized);
    }

    sanitized
}
