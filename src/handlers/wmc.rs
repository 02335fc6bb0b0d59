//! OGC Web Map Context documents (`.wmc`)

use async_trait::async_trait;

use crate::schema::XmlSchema;

use super::traits::{DocHandler, HandlerError, enforce_declared_schema};
use super::types::{DocPayload, DocType};

/// Handler for Web Map Context documents.
///
/// Contexts are machine-written and consumed back by viewers, so the
/// 1.1.0 schema is enforced on save by default.
pub struct WmcHandler {
    doc_type: DocType,
}

impl WmcHandler {
    pub fn new() -> Self {
        Self::with_enforcement(true)
    }

    pub fn with_enforcement(enforced: bool) -> Self {
        let schema = XmlSchema::new(
            "http://schemas.opengis.net/context/1.1.0/context.xsd",
            "ViewContext",
        )
        .with_namespace("http://www.opengis.net/context");

        let doc_type = DocType::new("WMC", ".wmc", "application/vnd.ogc.context+xml")
            .with_schema(schema)
            .enforce_schema(enforced);

        Self { doc_type }
    }
}

impl Default for WmcHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocHandler for WmcHandler {
    fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    async fn pre_save(&self, payload: &DocPayload) -> Result<(), HandlerError> {
        enforce_declared_schema(&self.doc_type, payload)
    }
}
