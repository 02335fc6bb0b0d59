//! Google Earth KML documents (`.kml`)

use async_trait::async_trait;
use bytes::Bytes;

use super::traits::{DocHandler, HandlerError};
use super::types::DocType;

const XML_DECLARATION: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Handler for KML documents.
///
/// KML has no registered schema here; the handler's job is on the way
/// out: Earth clients expect an XML declaration with an explicit
/// encoding, and plenty of uploaded files lack one, so `post_load`
/// prepends it when missing.
pub struct KmlHandler {
    doc_type: DocType,
}

impl KmlHandler {
    pub fn new() -> Self {
        Self {
            doc_type: DocType::new("KML", ".kml", "application/vnd.google-earth.kml+xml"),
        }
    }
}

impl Default for KmlHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocHandler for KmlHandler {
    fn doc_type(&self) -> &DocType {
        &self.doc_type
    }

    async fn post_load(&self, bytes: Bytes) -> Result<Bytes, HandlerError> {
        if has_declaration(&bytes) {
            return Ok(bytes);
        }

        let mut out = Vec::with_capacity(XML_DECLARATION.len() + 1 + bytes.len());
        out.extend_from_slice(XML_DECLARATION);
        out.push(b'\n');
        out.extend_from_slice(&bytes);
        Ok(Bytes::from(out))
    }
}

fn has_declaration(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(0);
    bytes[start..].starts_with(b"<?xml")
}
