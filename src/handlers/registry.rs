use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;

use super::kml::KmlHandler;
use super::sld::SldHandler;
use super::traits::DocHandler;
use super::wmc::WmcHandler;
use super::xml::XmlDocHandler;

/// Type keys registered by [`HandlerRegistry::with_defaults`].
pub const BUILTIN_TYPE_KEYS: [&str; 3] = ["KML", "SLD", "WMC"];

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown document type: {0}")]
    UnknownType(String),

    #[error("document type already registered: {0}")]
    DuplicateType(String),
}

/// Registry mapping document type keys to handler instances.
///
/// Built once at startup and frozen; a type key can be registered
/// exactly once for the lifetime of the registry.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Arc<dyn DocHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register a handler under its type key, rejecting keys that are
    /// already taken.
    pub fn register(&mut self, handler: Arc<dyn DocHandler>) -> Result<(), RegistryError> {
        let key = handler.doc_type().key().to_string();
        if self.handlers.contains_key(&key) {
            return Err(RegistryError::DuplicateType(key));
        }
        self.insert(handler);
        Ok(())
    }

    pub fn get(&self, type_key: &str) -> Result<Arc<dyn DocHandler>, RegistryError> {
        self.handlers
            .get(type_key)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType(type_key.to_string()))
    }

    pub fn has_handler(&self, type_key: &str) -> bool {
        self.handlers.contains_key(type_key)
    }

    /// Registered type keys in sorted order
    pub fn type_keys(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Create default registry with built-in handlers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // builtin keys are distinct, insertion cannot collide
        registry.insert(Arc::new(SldHandler::new()));
        registry.insert(Arc::new(WmcHandler::new()));
        registry.insert(Arc::new(KmlHandler::new()));

        registry
    }

    /// Registry assembled from a validated configuration: the built-in
    /// handlers with any `[builtins]` enforcement overrides applied, plus
    /// one [`XmlDocHandler`] per `[handlers]` entry.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let mut registry = Self::new();

        registry.insert(Arc::new(SldHandler::with_enforcement(
            config.builtin_enforcement("SLD").unwrap_or(false),
        )));
        registry.insert(Arc::new(WmcHandler::with_enforcement(
            config.builtin_enforcement("WMC").unwrap_or(true),
        )));
        registry.insert(Arc::new(KmlHandler::new()));

        for (key, settings) in &config.handlers {
            let handler = XmlDocHandler::new(settings.to_doc_type(key));
            registry.register(Arc::new(handler))?;
        }

        Ok(registry)
    }

    fn insert(&mut self, handler: Arc<dyn DocHandler>) {
        self.handlers
            .insert(handler.doc_type().key().to_string(), handler);
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuiltinSettings, HandlerSettings};

    #[test]
    fn defaults_register_builtin_types() {
        let registry = HandlerRegistry::with_defaults();
        assert_eq!(registry.type_keys(), BUILTIN_TYPE_KEYS);

        let handler = registry.get("SLD").unwrap();
        assert_eq!(handler.doc_type().extension(), ".sld");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let registry = HandlerRegistry::with_defaults();
        let err = registry.get("GPX").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownType(key) if key == "GPX"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = HandlerRegistry::with_defaults();
        let err = registry.register(Arc::new(SldHandler::new())).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType(key) if key == "SLD"));

        // the original handler stays in place
        assert!(registry.has_handler("SLD"));
    }

    #[test]
    fn config_toggles_builtin_enforcement() {
        let mut config = Config::default();
        config.builtins.insert(
            "sld".to_string(),
            BuiltinSettings {
                schema_enforced: true,
            },
        );
        config.builtins.insert(
            "wmc".to_string(),
            BuiltinSettings {
                schema_enforced: false,
            },
        );

        let registry = HandlerRegistry::from_config(&config).unwrap();
        assert!(registry.get("SLD").unwrap().doc_type().schema_enforced());
        assert!(!registry.get("WMC").unwrap().doc_type().schema_enforced());
        assert!(registry.has_handler("KML"));
    }

    #[test]
    fn config_registers_declared_types_alongside_builtins() {
        let mut config = Config::default();
        config.handlers.insert(
            "GPX".to_string(),
            HandlerSettings {
                extension: ".gpx".to_string(),
                mime_type: "application/gpx+xml".to_string(),
                schema_url: None,
                schema_root: None,
                schema_namespace: None,
                schema_enforced: false,
            },
        );

        let registry = HandlerRegistry::from_config(&config).unwrap();
        assert_eq!(registry.type_keys(), ["GPX", "KML", "SLD", "WMC"]);

        let handler = registry.get("GPX").unwrap();
        assert_eq!(handler.doc_type().mime_type(), "application/gpx+xml");
    }
}
