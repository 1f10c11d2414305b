//! rowgen: a compiler from declarative entity schemas to typed row-access APIs
//!
//! rowgen validates entity schemas (table name, ordered key format, typed
//! columns) and lowers them into abstract API descriptions: a staged key
//! builder chain, a column metadata registry with dynamic dispatch, and
//! derived equality/hash/string semantics. A source emitter turns the
//! descriptions into persisted artifacts; compiled entities register
//! themselves in a process-wide registry.

pub mod api;
pub mod config;
pub mod error;
pub mod plan;
pub mod registry;
pub mod runtime;
pub mod schema;
pub mod utils;

// Re-export main types for easier access
pub use api::{ApiDescription, JsonFileEmitter, MemoryEmitter, SourceEmitter};
pub use config::Config;
pub use error::{Diagnostic, DiagnosticKind, DispatchError, Error, Result, SchemaElement};
pub use plan::{ColumnId, KeyBuilder, RowKey};
pub use registry::EntityDescriptor;
pub use runtime::EntityInstance;
pub use schema::{CandidateSchema, ColumnSpec, EntitySchema, KeyComponentSpec, Value, ValueType};

use crate::schema::validator::validate;

/// Initialize rowgen with the specified configuration file
pub fn init(config_path: &str) -> Result<RowGenClient> {
    let config = config::load_from_file(config_path)?;
    utils::logging::init_logging(&config.logging)?;

    Ok(RowGenClient::new(config))
}

/// Per-entity results of a batch compilation
///
/// Entities compile independently; one entity's diagnostics never abort the
/// compilation of its siblings.
#[derive(Debug, Default)]
pub struct CompileReport {
    pub succeeded: Vec<ApiDescription>,
    pub failed: Vec<(String, Error)>,
}

impl CompileReport {
    /// Whether every entity compiled
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The main client for interacting with rowgen
pub struct RowGenClient {
    config: Config,
}

impl RowGenClient {
    /// Create a new rowgen client from configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a client with default configuration
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    /// Validate one candidate schema and lower it into an API description
    pub fn compile_entity(&self, candidate: &CandidateSchema) -> Result<ApiDescription> {
        let mut candidate = candidate.clone();

        if candidate.key_delimiter.is_none() {
            candidate.key_delimiter =
                Some(self.config.compiler.default_key_delimiter.clone());
        }

        match validate(&candidate) {
            Ok(entity_schema) => {
                let description = api::assemble(&entity_schema, &self.config.naming);

                tracing::debug!(
                    entity = %description.entity_name,
                    table = %description.table_name,
                    stages = description.key_plan.stages.len(),
                    columns = description.fields.len(),
                    "Compiled entity schema"
                );

                Ok(description)
            }
            Err(mut diagnostics) => {
                if self.config.compiler.fail_fast {
                    diagnostics.truncate(1);
                }

                Err(Error::ValidationError(diagnostics))
            }
        }
    }

    /// Compile a batch of candidates, isolating per-entity failures
    pub fn compile_all(&self, candidates: &[CandidateSchema]) -> CompileReport {
        let mut report = CompileReport::default();

        for candidate in candidates {
            match self.compile_entity(candidate) {
                Ok(description) => report.succeeded.push(description),
                Err(error) => {
                    tracing::warn!(
                        entity = %candidate.entity_name,
                        error = %error,
                        "Entity failed to compile"
                    );
                    report.failed.push((candidate.entity_name.clone(), error));
                }
            }
        }

        report
    }

    /// Register a compiled entity in the process-wide registry
    pub fn register(&self, description: &ApiDescription) -> Result<()> {
        registry::register(EntityDescriptor::from_api(description))
    }

    /// Compile one candidate and register it on success
    pub fn compile_and_register(&self, candidate: &CandidateSchema) -> Result<ApiDescription> {
        let description = self.compile_entity(candidate)?;
        self.register(&description)?;

        Ok(description)
    }

    /// Emitter targeting the configured output directory, if one is set
    pub fn output_emitter(&self) -> Option<JsonFileEmitter> {
        self.config
            .output
            .as_ref()
            .map(|output| JsonFileEmitter::new(&output.directory, output.pretty))
    }

    /// Emit a batch of compiled descriptions through an emitter
    pub fn emit_all(
        &self,
        emitter: &mut dyn SourceEmitter,
        descriptions: &[ApiDescription],
    ) -> Result<()> {
        for description in descriptions {
            emitter.emit(description)?;
        }

        Ok(())
    }
}
