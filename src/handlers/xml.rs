//! Configuration-declared XML document types

use async_trait::async_trait;

use super::traits::{DocHandler, HandlerError, enforce_declared_schema};
use super::types::{DocPayload, DocType};

/// Generic handler for document types declared in configuration.
///
/// Behavior follows the [`DocType`] it is built from: when the type
/// declares a schema and enforcement is on, saves are validated
/// against it; otherwise documents pass through untouched.
pub struct XmlDocHandler {
    doc_type: DocType,
}

impl XmlDocHandler {
    pub fn new(doc_type: DocType) -> Self {
        Self { doc_type }
    }
}

#[async_trait]
impl DocHandler for XmlDocHandler {
    fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    async fn pre_save(&self, payload: &DocPayload) -> Result<(), HandlerError> {
        enforce_declared_schema(&self.doc_type, payload)
    }
}
