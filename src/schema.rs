//! Structural XML validation against a declared document schema.
//!
//! Full XSD grammar validation is not performed and the schema URL is
//! never fetched. Each schema registers the structural facts
//! the service checks locally (expected root element and, when the format
//! is namespaced, the root namespace) on top of end-to-end well-formedness.
//! Violations carry a line/column position so callers can surface
//! actionable errors.

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use thiserror::Error;

/// Declared schema for one document type.
///
/// `location` is the canonical schema URL the type advertises; the
/// remaining fields drive [`validate_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSchema {
    location: String,
    root_element: String,
    namespace: Option<String>,
}

impl XmlSchema {
    pub fn new(location: impl Into<String>, root_element: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            root_element: root_element.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn root_element(&self) -> &str {
        &self.root_element
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

/// A document failed validation against its declared schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("schema {schema}: {message} at line {line}, column {column}")]
pub struct SchemaViolation {
    pub schema: String,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Validate document bytes against a declared schema.
///
/// Pure and stateless; safe to call concurrently.
pub fn validate_document(bytes: &[u8], schema: &XmlSchema) -> Result<(), SchemaViolation> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(violation(schema, "document is empty".to_string(), 1, 1));
    }

    let mut reader = NsReader::from_reader(bytes);
    let mut root_seen = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let (resolve, _) = reader.resolve_element(e.name());
                element_at(bytes, &reader, schema, &resolve, &e, &mut root_seen, depth)?;
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                let (resolve, _) = reader.resolve_element(e.name());
                element_at(bytes, &reader, schema, &resolve, &e, &mut root_seen, depth)?;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                let (line, column) = position(bytes, reader.buffer_position());
                return Err(violation(
                    schema,
                    format!("malformed XML: {e}"),
                    line,
                    column,
                ));
            }
        }
    }

    if !root_seen {
        return Err(violation(schema, "no root element".to_string(), 1, 1));
    }

    Ok(())
}

/// Per-element checks: the first element is validated as the root, and any
/// later element at depth zero means the document has more than one root.
fn element_at(
    bytes: &[u8],
    reader: &NsReader<&[u8]>,
    schema: &XmlSchema,
    resolve: &ResolveResult<'_>,
    e: &quick_xml::events::BytesStart<'_>,
    root_seen: &mut bool,
    depth: usize,
) -> Result<(), SchemaViolation> {
    if *root_seen && depth == 0 {
        let (line, column) = position(bytes, reader.buffer_position());
        return Err(violation(
            schema,
            "multiple root elements".to_string(),
            line,
            column,
        ));
    }
    if !*root_seen {
        *root_seen = true;
        check_root(bytes, reader, schema, resolve, e)?;
    }
    Ok(())
}

fn check_root(
    bytes: &[u8],
    reader: &NsReader<&[u8]>,
    schema: &XmlSchema,
    resolve: &ResolveResult<'_>,
    e: &quick_xml::events::BytesStart<'_>,
) -> Result<(), SchemaViolation> {
    let (line, column) = position(bytes, reader.buffer_position());
    let found = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();

    if found != schema.root_element() {
        return Err(violation(
            schema,
            format!(
                "unexpected root element '{found}', expected '{}'",
                schema.root_element()
            ),
            line,
            column,
        ));
    }

    if let Some(expected) = schema.namespace() {
        let bound = match resolve {
            ResolveResult::Bound(ns) => ns.as_ref() == expected.as_bytes(),
            _ => false,
        };
        if !bound {
            return Err(violation(
                schema,
                format!("root element '{found}' is not in namespace '{expected}'"),
                line,
                column,
            ));
        }
    }

    Ok(())
}

fn violation(schema: &XmlSchema, message: String, line: usize, column: usize) -> SchemaViolation {
    SchemaViolation {
        schema: schema.location().to_string(),
        message,
        line,
        column,
    }
}

/// 1-based line/column of a byte offset, column counted in bytes.
fn position(bytes: &[u8], offset: usize) -> (usize, usize) {
    let upto = offset.min(bytes.len());
    let line = bytes[..upto].iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = bytes[..upto]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|p| p + 1)
        .unwrap_or(0);
    (line, upto - line_start + 1)
}
