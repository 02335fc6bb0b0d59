use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "DOCBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/docbox.toml";
const ENV_PREFIX: &str = "DOCBOX";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    // Start with defaults (handled by struct Default implementations)
    // Add TOML file if it exists (optional)
    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // Add environment variable overrides
    // DOCBOX__STORAGE__ROOT -> storage.root
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageProvider;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.storage.provider, StorageProvider::Local);
        assert_eq!(config.limits.max_document_bytes.as_u64(), 5 * 1024 * 1024);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[storage]
provider = "memory"

[limits]
max_document_bytes = "10MB"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.storage.provider, StorageProvider::Memory);
        assert_eq!(config.limits.max_document_bytes.as_u64(), 10 * 1024 * 1024);
    }

    // Env override tests are omitted: std::env::set_var is unsafe to call
    // in a multithreaded test binary.

    #[test]
    fn test_complex_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[storage]
provider = "local"
root = "var/docbox/docs"

[ledger]
path = "var/docbox/ledger"

[limits]
max_document_bytes = "2MB"

[handlers.gpx]
extension = ".gpx"
mime_type = "application/gpx+xml"
schema_url = "https://www.topografix.com/GPX/1/1/gpx.xsd"
schema_root = "gpx"
schema_namespace = "http://www.topografix.com/GPX/1/1"
schema_enforced = true

[handlers.csv]
extension = ".csv"
mime_type = "text/csv"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();

        assert_eq!(config.storage.root, PathBuf::from("var/docbox/docs"));
        assert_eq!(config.ledger.path, PathBuf::from("var/docbox/ledger"));
        assert_eq!(config.limits.max_document_bytes.as_u64(), 2 * 1024 * 1024);

        assert_eq!(config.handlers.len(), 2);
        let gpx = &config.handlers["gpx"];
        assert_eq!(gpx.extension, ".gpx");
        assert!(gpx.schema_enforced);
        let csv = &config.handlers["csv"];
        assert_eq!(csv.mime_type, "text/csv");
        assert!(csv.schema_url.is_none());
    }
}
