//! Error types for rowgen

use serde::Serialize;
use thiserror::Error;

/// Result type for rowgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rowgen
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Schema validation failed: {}", format_diagnostics(.0))]
    ValidationError(Vec<Diagnostic>),

    #[error("Key builder error: {0}")]
    KeyBuilderError(String),

    #[error(transparent)]
    DispatchError(#[from] DispatchError),

    #[error("Registration error: {0}")]
    RegistrationError(String),

    #[error("Emit error: {0}")]
    EmitError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Return the validation diagnostics if this is a validation failure
    pub fn diagnostics(&self) -> Option<&[Diagnostic]> {
        match self {
            Error::ValidationError(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}

/// Runtime dispatch failures in a generated API
///
/// These are only reachable by misusing a column identifier outside the
/// guarantees of the registry it was drawn from. They are fatal to the
/// calling operation and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unrecognized column: {0}")]
    UnrecognizedColumn(String),

    #[error("Invalid column (not versioned): {0}")]
    InvalidColumn(String),

    #[error("Type mismatch for column {column}: expected {expected}")]
    TypeMismatch { column: String, expected: String },
}

/// A single schema violation, attributed to the most specific element
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub element: SchemaElement,
}

impl Diagnostic {
    /// Create a new diagnostic for a schema element
    pub fn new(kind: DiagnosticKind, element: SchemaElement, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            element,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {})", self.message, self.element)
    }
}

/// Distinct kinds of schema violations, one per validation rule
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DiagnosticKind {
    PublicOwner,
    MissingTableName,
    PubliclyConstructible,
    StaticEntity,
    NoColumns,
    NoKeyComponents,
    ImmutableColumn,
    SharedColumn,
    EmptyFamily,
    DuplicateColumn,
    DuplicateField,
    MalformedKeyComponent,
    DuplicateKeyComponent,
}

/// Reference to the schema element a diagnostic is attributed to
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum SchemaElement {
    Container(String),
    Entity(String),
    ColumnField(String),
    KeyComponent(usize),
}

impl std::fmt::Display for SchemaElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaElement::Container(name) => write!(f, "container `{}`", name),
            SchemaElement::Entity(name) => write!(f, "entity `{}`", name),
            SchemaElement::ColumnField(name) => write!(f, "column field `{}`", name),
            SchemaElement::KeyComponent(index) => write!(f, "key component #{}", index),
        }
    }
}

/// Join diagnostic messages for the top-level error display
fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convert Serde JSON errors to rowgen errors
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerializationError(error.to_string())
    }
}

/// Convert TOML deserialization errors to rowgen errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}
