//! OGC Styled Layer Descriptor documents (`.sld`)

use async_trait::async_trait;

use crate::schema::XmlSchema;

use super::traits::{DocHandler, HandlerError, enforce_declared_schema};
use super::types::{DocPayload, DocType};

/// Handler for Styled Layer Descriptor documents.
///
/// The type declares the SLD 1.1.0 schema but enforcement is off by
/// default: styles produced by common editors routinely deviate from
/// the strict schema and still render fine, so they are accepted
/// as-is. Construct with [`SldHandler::with_enforcement`] to turn the
/// check on.
pub struct SldHandler {
    doc_type: DocType,
}

impl SldHandler {
    pub fn new() -> Self {
        Self::with_enforcement(false)
    }

    pub fn with_enforcement(enforced: bool) -> Self {
        let schema = XmlSchema::new(
            "http://schemas.opengis.net/sld/1.1.0/StyledLayerDescriptor.xsd",
            "StyledLayerDescriptor",
        )
        .with_namespace("http://www.opengis.net/sld");

        let doc_type = DocType::new("SLD", ".sld", "application/vnd.ogc.sld+xml")
            .with_schema(schema)
            .enforce_schema(enforced);

        Self { doc_type }
    }
}

impl Default for SldHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocHandler for SldHandler {
    fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    async fn pre_save(&self, payload: &DocPayload) -> Result<(), HandlerError> {
        enforce_declared_schema(&self.doc_type, payload)
    }
}
