//! Configuration management for docbox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use docbox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Storing documents under: {}", config.storage.root.display());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `DOCBOX__<section>__<key>`
//!
//! Examples:
//! - `DOCBOX__STORAGE__ROOT=/var/lib/docbox/docs`
//! - `DOCBOX__STORAGE__PROVIDER=memory`
//! - `DOCBOX__LIMITS__MAX_DOCUMENT_BYTES=10MB`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/docbox.toml`.
//! This can be overridden using the `DOCBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use crate::humanize::ByteSize;
pub use models::{
    BuiltinSettings, Config, DocumentLimits, HandlerSettings, LedgerConfig, StorageConfig,
    StorageProvider,
};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`DOCBOX__*`)
    /// 2. TOML file (default: `config/docbox.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (builtin shadowing, malformed types, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[handlers.gpx]
extension = ".gpx"
mime_type = "application/gpx+xml"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.handlers.len(), 1);
        assert_eq!(config.storage.provider, StorageProvider::Local);
    }

    #[test]
    fn test_validation_catches_builtin_shadowing() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[handlers.sld]
extension = ".sld"
mime_type = "application/vnd.ogc.sld+xml"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::BuiltinOverride { .. })
        ));
    }

    #[test]
    fn test_full_config_example() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[storage]
provider = "local"
root = "data/docs"

[ledger]
path = "data/ledger"

[limits]
max_document_bytes = "5MB"

[builtins.sld]
schema_enforced = true

[handlers.gpx]
extension = ".gpx"
mime_type = "application/gpx+xml"
schema_url = "https://www.topografix.com/GPX/1/1/gpx.xsd"
schema_root = "gpx"
schema_namespace = "http://www.topografix.com/GPX/1/1"
schema_enforced = true

[handlers.geojson]
extension = ".json"
mime_type = "application/geo+json"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();

        // Verify all sections loaded correctly
        assert_eq!(config.storage.provider, StorageProvider::Local);
        assert_eq!(config.limits.max_document_bytes.as_u64(), 5 * 1024 * 1024);
        assert_eq!(config.builtin_enforcement("SLD"), Some(true));
        assert_eq!(config.handlers.len(), 2);

        let gpx = config.handlers["gpx"].to_doc_type("gpx");
        assert!(gpx.schema_enforced());
        assert_eq!(gpx.schema().unwrap().root_element(), "gpx");

        let geojson = config.handlers["geojson"].to_doc_type("geojson");
        assert!(geojson.schema().is_none());
    }
}
