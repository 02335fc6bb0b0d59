use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::handlers::DocType;
use crate::humanize::ByteSize;
use crate::schema::XmlSchema;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub limits: DocumentLimits,
    #[serde(default)]
    pub builtins: HashMap<String, BuiltinSettings>,
    #[serde(default)]
    pub handlers: HashMap<String, HandlerSettings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            ledger: LedgerConfig::default(),
            limits: DocumentLimits::default(),
            builtins: HashMap::new(),
            handlers: HashMap::new(),
        }
    }
}

impl Config {
    /// Enforcement override declared for a built-in type, if any.
    /// Keys are matched case-insensitively; config sources lowercase them.
    pub fn builtin_enforcement(&self, key: &str) -> Option<bool> {
        self.builtins
            .iter()
            .find(|(declared, _)| declared.eq_ignore_ascii_case(key))
            .map(|(_, settings)| settings.schema_enforced)
    }
}

/// Storage provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Local,
    Memory,
}

impl Default for StorageProvider {
    fn default() -> Self {
        StorageProvider::Local
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    /// Directory documents are stored under (local provider)
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            root: default_storage_root(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("data/docs")
}

/// Ledger configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("data/ledger")
}

/// Per-document limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentLimits {
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: ByteSize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

fn default_max_document_bytes() -> ByteSize {
    ByteSize(5 * 1024 * 1024) // 5 MB
}

/// Per-builtin settings. The shape of a built-in type is fixed in code;
/// only schema enforcement can be toggled here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuiltinSettings {
    /// Validate saves against the type's declared schema
    #[serde(default)]
    pub schema_enforced: bool,
}

/// A document type declared in configuration, registered alongside the
/// built-in types at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerSettings {
    /// File extension including the leading dot (e.g. ".gpx")
    pub extension: String,
    /// MIME type loads are served as
    pub mime_type: String,
    /// Schema location, set together with `schema_root`
    pub schema_url: Option<String>,
    /// Expected root element local name
    pub schema_root: Option<String>,
    /// Expected root element namespace, if the format is namespaced
    pub schema_namespace: Option<String>,
    /// Validate saves against the declared schema
    #[serde(default)]
    pub schema_enforced: bool,
}

impl HandlerSettings {
    /// Build the type descriptor for a validated entry.
    pub fn to_doc_type(&self, key: &str) -> DocType {
        let mut doc_type = DocType::new(key, self.extension.as_str(), self.mime_type.as_str());

        if let (Some(url), Some(root)) = (&self.schema_url, &self.schema_root) {
            let mut schema = XmlSchema::new(url.as_str(), root.as_str());
            if let Some(namespace) = &self.schema_namespace {
                schema = schema.with_namespace(namespace.as_str());
            }
            doc_type = doc_type
                .with_schema(schema)
                .enforce_schema(self.schema_enforced);
        }

        doc_type
    }
}
