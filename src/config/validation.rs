use super::models::{Config, HandlerSettings};
use crate::handlers::BUILTIN_TYPE_KEYS;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Handler key '{key}' is empty or contains whitespace")]
    InvalidHandlerKey { key: String },

    #[error("Handler '{key}' would shadow a built-in document type")]
    BuiltinOverride { key: String },

    #[error("Handler '{key}': extension '{extension}' must be '.' followed by ascii alphanumerics")]
    InvalidExtension { key: String, extension: String },

    #[error("Handler '{key}': invalid MIME type '{mime_type}'")]
    InvalidMimeType { key: String, mime_type: String },

    #[error("Handler '{key}': incomplete schema declaration, schema_url and schema_root are both required")]
    IncompleteSchema { key: String },

    #[error("Handler '{key}': schema_enforced requires a declared schema")]
    EnforcementWithoutSchema { key: String },

    #[error("[builtins] key '{key}' does not name a built-in document type")]
    UnknownBuiltin { key: String },

    #[error("max_document_bytes must be positive")]
    InvalidDocumentLimit,

    #[error("Storage root must not be empty")]
    EmptyStorageRoot,

    #[error("Ledger path must not be empty")]
    EmptyLedgerPath,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_limits(config)?;
    validate_paths(config)?;
    validate_builtins(config)?;
    validate_handlers(config)?;
    Ok(())
}

fn validate_limits(config: &Config) -> Result<(), ValidationError> {
    if config.limits.max_document_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidDocumentLimit);
    }
    Ok(())
}

fn validate_paths(config: &Config) -> Result<(), ValidationError> {
    if config.storage.root.as_os_str().is_empty() {
        return Err(ValidationError::EmptyStorageRoot);
    }
    if config.ledger.path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyLedgerPath);
    }
    Ok(())
}

fn validate_builtins(config: &Config) -> Result<(), ValidationError> {
    for (key, settings) in &config.builtins {
        if !BUILTIN_TYPE_KEYS
            .iter()
            .any(|builtin| builtin.eq_ignore_ascii_case(key))
        {
            return Err(ValidationError::UnknownBuiltin { key: key.clone() });
        }

        // KML declares no schema, so there is nothing to enforce.
        if settings.schema_enforced && key.eq_ignore_ascii_case("KML") {
            return Err(ValidationError::EnforcementWithoutSchema { key: key.clone() });
        }
    }

    Ok(())
}

/// Ensure every configured handler entry can become a registrable type
fn validate_handlers(config: &Config) -> Result<(), ValidationError> {
    for (key, settings) in &config.handlers {
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidHandlerKey { key: key.clone() });
        }

        // Keys from TOML and environment sources differ in case, so the
        // builtin collision check ignores it.
        if BUILTIN_TYPE_KEYS
            .iter()
            .any(|builtin| builtin.eq_ignore_ascii_case(key))
        {
            return Err(ValidationError::BuiltinOverride { key: key.clone() });
        }

        validate_extension(key, settings)?;
        validate_mime_type(key, settings)?;
        validate_schema(key, settings)?;
    }

    Ok(())
}

fn validate_extension(key: &str, settings: &HandlerSettings) -> Result<(), ValidationError> {
    let ext = settings.extension.as_str();
    let well_formed = ext.len() >= 2
        && ext.starts_with('.')
        && ext[1..].chars().all(|c| c.is_ascii_alphanumeric());

    if !well_formed {
        return Err(ValidationError::InvalidExtension {
            key: key.to_string(),
            extension: ext.to_string(),
        });
    }
    Ok(())
}

fn validate_mime_type(key: &str, settings: &HandlerSettings) -> Result<(), ValidationError> {
    if settings.mime_type.parse::<mime::Mime>().is_err() {
        return Err(ValidationError::InvalidMimeType {
            key: key.to_string(),
            mime_type: settings.mime_type.clone(),
        });
    }
    Ok(())
}

fn validate_schema(key: &str, settings: &HandlerSettings) -> Result<(), ValidationError> {
    let has_schema = settings.schema_url.is_some();

    if has_schema != settings.schema_root.is_some() {
        return Err(ValidationError::IncompleteSchema {
            key: key.to_string(),
        });
    }
    if settings.schema_namespace.is_some() && !has_schema {
        return Err(ValidationError::IncompleteSchema {
            key: key.to_string(),
        });
    }
    if settings.schema_enforced && !has_schema {
        return Err(ValidationError::EnforcementWithoutSchema {
            key: key.to_string(),
        });
    }

    Ok(())
}
