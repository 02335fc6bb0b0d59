//! The document service: typed save/load over handlers, storage, and
//! the ledger
//!
//! Every operation starts by resolving the caller's type key to a
//! registered handler; the handler's hooks then bracket the storage
//! work. A save that fails after the document hit storage deletes it
//! again, so either the call returns an id whose document exists, or
//! it returns an error and leaves nothing behind.

pub mod error;

pub use error::{ErrorClass, Hook, ServiceError};

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::DocumentLimits;
use crate::handlers::{DocHandler, DocPayload, HandlerRegistry, LoadedDoc};
use crate::ledger::{DocRecord, FjallLedger, LedgerStats};
use crate::observability::Metrics;
use crate::storage::{DocStorage, StorageError, StorageId};

/// Outcome of one retention sweep
#[derive(Debug, Clone, Default)]
pub struct SweepStats {
    pub examined: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Coordinates handler hooks, blob storage, and the document ledger.
///
/// Cheap to clone; clones share storage, ledger, and metrics.
#[derive(Clone)]
pub struct DocService {
    registry: Arc<HandlerRegistry>,
    storage: DocStorage,
    ledger: FjallLedger,
    metrics: Arc<Metrics>,
    max_document_bytes: u64,
}

impl DocService {
    pub fn new(
        registry: HandlerRegistry,
        storage: DocStorage,
        ledger: FjallLedger,
        limits: &DocumentLimits,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            storage,
            ledger,
            metrics: Arc::new(Metrics::new()),
            max_document_bytes: limits.max_document_bytes.as_u64(),
        }
    }

    /// Save a document under a registered type and return its new id.
    ///
    /// Runs `pre_save` before anything is written and `post_save` after;
    /// a failure in `post_save` (or while recording the document) deletes
    /// the stored blob before the error is returned.
    pub async fn save(&self, type_key: &str, bytes: Bytes) -> Result<StorageId, ServiceError> {
        let handler = self.resolve(type_key)?;
        let doc_type = handler.doc_type();

        if let Err(e) = self.admit(type_key, &bytes) {
            self.metrics.save_rejected();
            return Err(e);
        }

        let payload = DocPayload::new(type_key, bytes);

        if let Err(e) = handler.pre_save(&payload).await {
            self.metrics.save_rejected();
            return Err(ServiceError::from_handler(Hook::PreSave, type_key, e));
        }

        let id = self
            .storage
            .write(doc_type.extension(), payload.bytes.clone())
            .await?;

        if let Err(e) = handler.post_save(&id, &payload).await {
            self.unwind_save(&id).await;
            return Err(ServiceError::from_handler(Hook::PostSave, type_key, e));
        }

        let record = DocRecord {
            storage_id: id.clone(),
            type_key: type_key.to_string(),
            created_at: Utc::now(),
            size_bytes: payload.bytes.len() as u64,
        };
        if let Err(e) = self.ledger.insert(&record) {
            self.unwind_save(&id).await;
            return Err(e.into());
        }

        self.metrics.doc_saved();
        info!(doc_type = type_key, id = %id, size = record.size_bytes, "document saved");

        Ok(id)
    }

    /// Run the save-side checks against a document without writing it.
    ///
    /// Covers everything `save` checks before storage is touched: the
    /// type must be registered, the document non-empty and within the
    /// size limit, and the handler's `pre_save` hook must accept it.
    pub async fn validate(&self, type_key: &str, bytes: Bytes) -> Result<(), ServiceError> {
        let handler = self.resolve(type_key)?;
        self.admit(type_key, &bytes)?;

        let payload = DocPayload::new(type_key, bytes);
        handler
            .pre_save(&payload)
            .await
            .map_err(|e| ServiceError::from_handler(Hook::PreSave, type_key, e))
    }

    /// Load a document of the given type back by id.
    pub async fn load(&self, type_key: &str, raw_id: &str) -> Result<LoadedDoc, ServiceError> {
        let handler = self.resolve(type_key)?;

        let Ok(id) = StorageId::parse(raw_id) else {
            return Err(ServiceError::NotFound {
                id: raw_id.to_string(),
            });
        };

        handler
            .pre_load(&id)
            .await
            .map_err(|e| ServiceError::from_handler(Hook::PreLoad, type_key, e))?;

        let bytes = match self.storage.read(&id).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => {
                return Err(ServiceError::NotFound { id: id.to_string() });
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = handler
            .post_load(bytes)
            .await
            .map_err(|e| ServiceError::from_handler(Hook::PostLoad, type_key, e))?;

        self.metrics.doc_loaded();
        info!(doc_type = type_key, id = %id, size = bytes.len(), "document loaded");

        Ok(LoadedDoc {
            bytes,
            mime_type: handler.doc_type().mime_type().to_string(),
        })
    }

    /// Whether a document of the given type exists under this id.
    pub async fn check(&self, type_key: &str, raw_id: &str) -> Result<bool, ServiceError> {
        let handler = self.resolve(type_key)?;

        let Ok(id) = StorageId::parse(raw_id) else {
            return Ok(false);
        };
        if handler.pre_load(&id).await.is_err() {
            return Ok(false);
        }

        Ok(self.storage.exists(&id).await?)
    }

    /// Ledger record for an id, if the document is known.
    pub fn describe(&self, raw_id: &str) -> Result<Option<DocRecord>, ServiceError> {
        let Ok(id) = StorageId::parse(raw_id) else {
            return Ok(None);
        };
        Ok(self.ledger.get(&id)?)
    }

    /// Delete a document of the given type. Discarding an id that does
    /// not exist (or never could) is not an error.
    pub async fn discard(&self, type_key: &str, raw_id: &str) -> Result<(), ServiceError> {
        let handler = self.resolve(type_key)?;

        let Ok(id) = StorageId::parse(raw_id) else {
            return Ok(());
        };
        if handler.pre_load(&id).await.is_err() {
            return Ok(());
        }

        self.storage.delete(&id).await?;
        self.ledger.remove(&id)?;

        info!(doc_type = type_key, id = %id, "document discarded");
        Ok(())
    }

    /// Delete every document saved strictly before the cutoff.
    ///
    /// Failures on individual documents are logged and counted, not
    /// fatal; the sweep keeps going.
    pub async fn sweep_expired(&self, cutoff: DateTime<Utc>) -> Result<SweepStats, ServiceError> {
        let expired = self.ledger.saved_before(cutoff)?;
        let mut stats = SweepStats {
            examined: expired.len(),
            ..Default::default()
        };

        for record in expired {
            let removed = match self.storage.delete(&record.storage_id).await {
                Ok(()) => match self.ledger.remove(&record.storage_id) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(id = %record.storage_id, error = %e, "sweep kept ledger record");
                        false
                    }
                },
                Err(e) => {
                    warn!(id = %record.storage_id, error = %e, "sweep failed to delete document");
                    false
                }
            };
            if removed {
                stats.deleted += 1;
            } else {
                stats.failed += 1;
            }
        }

        self.ledger.mark_swept(Utc::now())?;
        self.ledger.persist()?;
        self.metrics.docs_swept(stats.deleted as u64);
        info!(
            examined = stats.examined,
            deleted = stats.deleted,
            failed = stats.failed,
            "sweep completed"
        );

        Ok(stats)
    }

    /// Ledger totals (document count, stored bytes)
    pub fn stats(&self) -> Result<LedgerStats, ServiceError> {
        Ok(self.ledger.stats()?)
    }

    /// When the last sweep ran, if ever
    pub fn last_swept(&self) -> Result<Option<DateTime<Utc>>, ServiceError> {
        Ok(self.ledger.last_swept()?)
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn resolve(&self, type_key: &str) -> Result<Arc<dyn DocHandler>, ServiceError> {
        self.registry
            .get(type_key)
            .map_err(|_| ServiceError::UnknownType(type_key.to_string()))
    }

    /// Size and emptiness checks shared by `save` and `validate`.
    fn admit(&self, type_key: &str, bytes: &Bytes) -> Result<(), ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::Rejected {
                type_key: type_key.to_string(),
                reason: "document is empty".to_string(),
            });
        }
        if bytes.len() as u64 > self.max_document_bytes {
            return Err(ServiceError::TooLarge {
                size: bytes.len() as u64,
                limit: self.max_document_bytes,
            });
        }
        Ok(())
    }

    /// Roll a half-finished save back by deleting the stored blob.
    async fn unwind_save(&self, id: &StorageId) {
        self.metrics.save_compensated();
        if let Err(e) = self.storage.delete(id).await {
            warn!(id = %id, error = %e, "failed to delete document while unwinding save");
        }
    }
}
