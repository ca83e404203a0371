//! # Configuration File Loading
//!
//! Loads the connection and mapping files from TOML or YAML.
//!
//! Supports automatic format detection based on file extension.

use errors::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Load a configuration structure from a TOML file.
///
/// ## Error Handling
/// Returns `ConfigError` for:
/// - File not found or unreadable
/// - Invalid TOML syntax or wrong value types
pub fn load_from_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = read(path)?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        format: "TOML".to_string(),
        reason: e.to_string()
    })
}

/// Load a configuration structure from a YAML file.
///
/// ## Error Handling
/// Returns `ConfigError` for:
/// - File not found or unreadable
/// - Invalid YAML syntax or wrong value types
pub fn load_from_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = read(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        format: "YAML".to_string(),
        reason: e.to_string()
    })
}

/// Load a configuration structure from file with auto-detection.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Loads either DTP file, detecting the format from the extension.
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml`: YAML format
/// - `.yml`: YAML format
///
/// ## Usage
/// ```rust,no_run
/// use config::{load_from_file, UriMappings};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mappings: UriMappings = load_from_file(Path::new("uri_mappings.yaml"))?;
///     println!("{} ontology terms", mappings.ontology_uris.len());
///     Ok(())
/// }
/// ```
pub fn load_from_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ConfigError::NoExtension {
            path: path.display().to_string()
        })?;

    debug!(path = %path.display(), "Loading configuration file");

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(ConfigError::UnsupportedFormat {
            extension: other.to_string()
        })
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_e| ConfigError::FileNotFound {
        path: path.display().to_string()
    })
}
