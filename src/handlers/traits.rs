use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::schema::{SchemaViolation, validate_document};
use crate::storage::StorageId;

use super::types::{DocPayload, DocType};

/// Handler errors
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("document rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("document processing failed: {0}")]
    Processing(String),
}

/// Per-type document handler with lifecycle hooks around save and load.
///
/// A handler owns the identity of its document type and can intercept
/// the save/load flow at four points. All hooks default to accepting
/// pass-throughs, so a minimal handler only supplies its [`DocType`].
/// The trait is async to allow hooks that do I/O.
#[async_trait]
pub trait DocHandler: Send + Sync {
    /// The document type this handler manages
    fn doc_type(&self) -> &DocType;

    /// Inspect the payload before it is persisted. Returning an error
    /// stops the save with nothing written.
    async fn pre_save(&self, _payload: &DocPayload) -> Result<(), HandlerError> {
        Ok(())
    }

    /// React to a successful persist (optional hook). An error here
    /// makes the service delete the just-written document.
    async fn post_save(&self, _id: &StorageId, _payload: &DocPayload) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Check an id before its document is read back. The default
    /// rejects ids whose extension does not belong to this type, so a
    /// document saved under one type stays invisible to the others.
    async fn pre_load(&self, id: &StorageId) -> Result<(), HandlerError> {
        let expected = self.doc_type().extension();
        if id.extension() != Some(expected) {
            return Err(HandlerError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Transform loaded bytes before they are returned (optional hook)
    async fn post_load(&self, bytes: Bytes) -> Result<Bytes, HandlerError> {
        Ok(bytes)
    }
}

impl std::fmt::Debug for dyn DocHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocHandler")
            .field("doc_type", self.doc_type())
            .finish()
    }
}

/// Validate a payload against its type's declared schema.
///
/// Honors the type's enforcement flag: a type with no schema, or with
/// enforcement off, accepts anything here.
pub fn enforce_declared_schema(
    doc_type: &DocType,
    payload: &DocPayload,
) -> Result<(), HandlerError> {
    if !doc_type.schema_enforced() {
        return Ok(());
    }
    let Some(schema) = doc_type.schema() else {
        return Ok(());
    };
    validate_document(&payload.bytes, schema)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::XmlSchema;

    struct BareHandler {
        doc_type: DocType,
    }

    impl BareHandler {
        fn new() -> Self {
            Self {
                doc_type: DocType::new("CSV", ".csv", "text/csv"),
            }
        }
    }

    #[async_trait]
    impl DocHandler for BareHandler {
        fn doc_type(&self) -> &DocType {
            &self.doc_type
        }
    }

    #[tokio::test]
    async fn default_hooks_pass_everything_through() {
        let handler = BareHandler::new();
        let payload = DocPayload::new("CSV", &b"a,b,c"[..]);

        handler.pre_save(&payload).await.unwrap();

        let id = StorageId::generate(".csv");
        handler.post_save(&id, &payload).await.unwrap();
        handler.pre_load(&id).await.unwrap();

        let bytes = Bytes::from_static(b"a,b,c");
        assert_eq!(handler.post_load(bytes.clone()).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn default_pre_load_rejects_foreign_extension() {
        let handler = BareHandler::new();
        let id = StorageId::generate(".sld");

        let err = handler.pre_load(&id).await.unwrap_err();
        assert!(matches!(err, HandlerError::NotFound(_)));
    }

    #[test]
    fn schema_enforcement_respects_flag() {
        let schema = XmlSchema::new("https://example.org/report.xsd", "Report");
        let relaxed = DocType::new("REPORT", ".xml", "application/xml").with_schema(schema.clone());
        let strict = relaxed.clone().enforce_schema(true);

        let bad = DocPayload::new("REPORT", &b"<Wrong/>"[..]);
        assert!(enforce_declared_schema(&relaxed, &bad).is_ok());
        assert!(matches!(
            enforce_declared_schema(&strict, &bad),
            Err(HandlerError::Schema(_))
        ));

        let good = DocPayload::new("REPORT", &b"<Report/>"[..]);
        assert!(enforce_declared_schema(&strict, &good).is_ok());
    }
}
