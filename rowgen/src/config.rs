//! Configuration handling for rowgen

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Error, Result};
use crate::schema::types::DEFAULT_KEY_DELIMITER;

/// Load configuration from a TOML file
pub fn load_from_file(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| Error::ConfigError(format!("Failed to read config file: {}", e)))?;

    let config: Config = toml::from_str(&config_str)?;

    Ok(config)
}

/// Represents the complete rowgen configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

/// Compiler behavior configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompilerConfig {
    /// Stop at the first diagnostic instead of collecting all of them
    #[serde(default)]
    pub fail_fast: bool,
    /// Delimiter used when a schema does not declare one
    #[serde(default = "default_key_delimiter")]
    pub default_key_delimiter: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            default_key_delimiter: default_key_delimiter(),
        }
    }
}

/// Naming conventions for generated identifiers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NamingConfig {
    /// Convention for generated type names
    #[serde(default = "default_type_style")]
    pub type_style: String,
    /// Convention for generated method names
    #[serde(default = "default_method_style")]
    pub method_style: String,
    /// Pattern for key builder stage type names
    #[serde(default = "default_stage_pattern")]
    pub stage_pattern: String,
    /// Pattern for the terminal builder type name
    #[serde(default = "default_terminal_pattern")]
    pub terminal_pattern: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            type_style: default_type_style(),
            method_style: default_method_style(),
            stage_pattern: default_stage_pattern(),
            terminal_pattern: default_terminal_pattern(),
        }
    }
}

/// Output generation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: String,
    #[serde(default)]
    pub pretty: bool,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub format: String,
    pub stdout: bool,
}

fn default_key_delimiter() -> String {
    DEFAULT_KEY_DELIMITER.to_string()
}

fn default_type_style() -> String {
    "pascal_case".to_string()
}

fn default_method_style() -> String {
    "snake_case".to_string()
}

fn default_stage_pattern() -> String {
    "{entity}KeyBuilder{component}".to_string()
}

fn default_terminal_pattern() -> String {
    "{entity}KeyReady".to_string()
}
