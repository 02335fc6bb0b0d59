//! Key layout and encoding utilities for Fjall partitions
//!
//! Partition structure:
//! - `docs`: doc:{storage_id} -> DocRecord (JSON)
//! - `metadata`: meta:{key} -> value (string)

/// Encode a document key: doc:{storage_id}
pub fn encode_doc_key(storage_id: &str) -> Vec<u8> {
    format!("doc:{}", storage_id).into_bytes()
}

/// Decode a document key: doc:{storage_id} -> storage_id
pub fn decode_doc_key(key: &[u8]) -> Option<String> {
    let key_str = std::str::from_utf8(key).ok()?;
    key_str.strip_prefix("doc:").map(String::from)
}

/// Encode a metadata key: meta:{key}
pub fn encode_meta_key(key: &str) -> Vec<u8> {
    format!("meta:{}", key).into_bytes()
}
