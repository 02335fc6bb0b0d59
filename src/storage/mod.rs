//! Document blob storage.
//! Uses Apache Arrow object_store over a local directory or memory.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::{ObjectStore, path::Path as StoragePath};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage id: {0:?}")]
    InvalidId(String),

    #[error("no stored document {0}")]
    NotFound(String),

    #[error("storage root unavailable: {0}")]
    Root(#[from] std::io::Error),

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Opaque name of one stored document, `<uuid><extension>`.
///
/// The id doubles as the storage key, so parsing is strict: a single
/// path segment from a fixed character set, never a dotfile and never
/// containing `..`. Anything else is rejected before it reaches the
/// backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageId(String);

impl StorageId {
    /// Mint a fresh id for a document with the given extension
    /// (including the leading dot).
    pub fn generate(extension: &str) -> Self {
        Self(format!("{}{}", Uuid::now_v7().simple(), extension))
    }

    /// Parse an externally supplied id, rejecting anything that could
    /// escape the storage root.
    pub fn parse(raw: &str) -> Result<Self> {
        let safe = !raw.is_empty()
            && raw.len() <= 128
            && !raw.starts_with('.')
            && !raw.contains("..")
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

        if safe {
            Ok(Self(raw.to_string()))
        } else {
            Err(StorageError::InvalidId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extension carried by the id, including the leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.0.rfind('.').map(|i| &self.0[i..])
    }
}

impl std::fmt::Display for StorageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document store wrapping any object_store backend
#[derive(Clone)]
pub struct DocStorage {
    store: Arc<dyn ObjectStore>,
    location: String,
}

impl DocStorage {
    pub fn new(store: Arc<dyn ObjectStore>, location: impl Into<String>) -> Self {
        Self {
            store,
            location: location.into(),
        }
    }

    /// Store documents under a local directory, created if missing.
    ///
    /// LocalFileSystem stages every put to a temporary file and renames
    /// it into place, so a stored document is never visible half-written.
    pub fn local(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let store = LocalFileSystem::new_with_prefix(root)?;

        Ok(Self {
            store: Arc::new(store),
            location: root.display().to_string(),
        })
    }

    /// In-memory storage for testing/development
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(object_store::memory::InMemory::new()),
            location: "memory".to_string(),
        }
    }

    /// Write document bytes under a freshly minted id.
    pub async fn write(&self, extension: &str, data: Bytes) -> Result<StorageId> {
        let id = StorageId::generate(extension);
        let path = self.object_path(&id)?;
        let size = data.len();

        self.store.put(&path, data.into()).await?;

        tracing::info!(id = %id, size, store = %self.location, "stored document");

        Ok(id)
    }

    /// Read a stored document back.
    pub async fn read(&self, id: &StorageId) -> Result<Bytes> {
        let path = self.object_path(id)?;

        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(StorageError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let bytes = result.bytes().await?;

        tracing::info!(id = %id, size = bytes.len(), store = %self.location, "read document");

        Ok(bytes)
    }

    /// Remove a stored document. Removing an id that no longer exists
    /// is not an error.
    pub async fn delete(&self, id: &StorageId) -> Result<()> {
        let path = self.object_path(id)?;

        match self.store.delete(&path).await {
            Ok(()) => {
                tracing::info!(id = %id, store = %self.location, "deleted document");
                Ok(())
            }
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a document exists under this id.
    pub async fn exists(&self, id: &StorageId) -> Result<bool> {
        let path = self.object_path(id)?;

        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn object_path(&self, id: &StorageId) -> Result<StoragePath> {
        StoragePath::parse(id.as_str()).map_err(|_| StorageError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_extension() {
        let id = StorageId::generate(".sld");
        assert!(id.as_str().ends_with(".sld"));
        assert_eq!(id.extension(), Some(".sld"));
        assert!(StorageId::parse(id.as_str()).is_ok());
    }

    #[test]
    fn parse_rejects_unsafe_ids() {
        for raw in ["", "..", "../../etc/passwd", "a/b.sld", ".hidden", "a b.sld"] {
            assert!(
                matches!(StorageId::parse(raw), Err(StorageError::InvalidId(_))),
                "{raw:?} should be rejected"
            );
        }

        assert!(StorageId::parse("0192aef2c41a7b3e9d5f0c8a1b2c3d4e.sld").is_ok());
    }

    #[tokio::test]
    async fn write_read_round_trip() {
        let storage = DocStorage::in_memory();
        let body = Bytes::from_static(b"<StyledLayerDescriptor/>");

        let id = storage.write(".sld", body.clone()).await.unwrap();
        let read = storage.read(&id).await.unwrap();

        assert_eq!(read, body);
        assert!(storage.exists(&id).await.unwrap());
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let storage = DocStorage::in_memory();
        let id = StorageId::parse("0192aef2c41a7b3e9d5f0c8a1b2c3d4e.sld").unwrap();

        let err = storage.read(&id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let storage = DocStorage::in_memory();
        let id = storage
            .write(".wmc", Bytes::from_static(b"<ViewContext/>"))
            .await
            .unwrap();

        storage.delete(&id).await.unwrap();
        storage.delete(&id).await.unwrap();
        assert!(!storage.exists(&id).await.unwrap());
    }
}
