use bytes::Bytes;

use crate::schema::XmlSchema;

/// Immutable description of one registered document type.
///
/// The key names the type in save/load calls, the extension is stamped
/// onto every storage id minted for it, and the MIME type is what loads
/// are served as. A type may declare a schema; whether documents are
/// actually validated against it is controlled by the enforcement flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocType {
    key: String,
    extension: String,
    mime_type: String,
    schema: Option<XmlSchema>,
    schema_enforced: bool,
}

impl DocType {
    /// New type with no declared schema. `extension` includes the
    /// leading dot.
    pub fn new(
        key: impl Into<String>,
        extension: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            extension: extension.into(),
            mime_type: mime_type.into(),
            schema: None,
            schema_enforced: false,
        }
    }

    pub fn with_schema(mut self, schema: XmlSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn enforce_schema(mut self, enforced: bool) -> Self {
        self.schema_enforced = enforced;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn schema(&self) -> Option<&XmlSchema> {
        self.schema.as_ref()
    }

    pub fn schema_enforced(&self) -> bool {
        self.schema_enforced
    }
}

/// Document bytes submitted for saving under a given type.
#[derive(Debug, Clone)]
pub struct DocPayload {
    pub type_key: String,
    pub bytes: Bytes,
}

impl DocPayload {
    pub fn new(type_key: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            type_key: type_key.into(),
            bytes: bytes.into(),
        }
    }
}

/// Document bytes returned from a load, with the MIME type to serve
/// them as.
#[derive(Debug, Clone)]
pub struct LoadedDoc {
    pub bytes: Bytes,
    pub mime_type: String,
}
