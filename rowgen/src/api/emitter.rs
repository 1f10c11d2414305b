//! Source emitter interface
//!
//! Rendering an API description into target-language source is the job of an
//! external collaborator; this module defines the seam plus two simple
//! emitters used by the driver and the test suite.

use std::fs;
use std::path::PathBuf;

use crate::api::description::ApiDescription;
use crate::error::{Error, Result};

/// Consumer of assembled API descriptions
pub trait SourceEmitter {
    /// Emit one entity's API description
    fn emit(&mut self, api: &ApiDescription) -> Result<()>;
}

/// Emitter that collects descriptions in memory
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    pub emitted: Vec<ApiDescription>,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceEmitter for MemoryEmitter {
    fn emit(&mut self, api: &ApiDescription) -> Result<()> {
        self.emitted.push(api.clone());
        Ok(())
    }
}

/// Emitter that writes one JSON snapshot per entity into a directory
pub struct JsonFileEmitter {
    directory: PathBuf,
    pretty: bool,
}

impl JsonFileEmitter {
    /// Create an emitter targeting the given directory
    pub fn new(directory: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            directory: directory.into(),
            pretty,
        }
    }
}

impl SourceEmitter for JsonFileEmitter {
    fn emit(&mut self, api: &ApiDescription) -> Result<()> {
        fs::create_dir_all(&self.directory)?;

        let path = self.directory.join(format!("{}.json", api.entity_name));
        let json = api.to_json(self.pretty)?;

        fs::write(&path, json).map_err(|e| {
            Error::EmitError(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(entity = %api.entity_name, path = %path.display(), "Emitted API description");

        Ok(())
    }
}
