use std::path::Path;

use chrono::{DateTime, Utc};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::storage::StorageId;

use super::error::Result;
use super::partitions::{encode_doc_key, encode_meta_key};

const LAST_SWEEP_KEY: &str = "last_sweep";

/// Ledger entry for one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    pub storage_id: StorageId,
    pub type_key: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Fjall-backed persistent record of every stored document
#[derive(Clone)]
pub struct FjallLedger {
    keyspace: Keyspace,
    docs: PartitionHandle,
    metadata: PartitionHandle,
}

impl FjallLedger {
    /// Open or create a Fjall ledger at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening document ledger at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;

        let docs = keyspace.open_partition("docs", PartitionCreateOptions::default())?;
        let metadata = keyspace.open_partition("metadata", PartitionCreateOptions::default())?;

        Ok(Self {
            keyspace,
            docs,
            metadata,
        })
    }

    /// Record a stored document
    pub fn insert(&self, record: &DocRecord) -> Result<()> {
        let key = encode_doc_key(record.storage_id.as_str());
        let value = serde_json::to_vec(record)?;
        self.docs.insert(key, value)?;
        debug!("Recorded document: {}", record.storage_id);
        Ok(())
    }

    /// Get the record for a storage id
    pub fn get(&self, storage_id: &StorageId) -> Result<Option<DocRecord>> {
        let key = encode_doc_key(storage_id.as_str());
        match self.docs.get(key)? {
            Some(value) => {
                let record = serde_json::from_slice(&value)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Drop the record for a storage id. Removing an unknown id is not
    /// an error.
    pub fn remove(&self, storage_id: &StorageId) -> Result<()> {
        let key = encode_doc_key(storage_id.as_str());
        self.docs.remove(key)?;
        debug!("Dropped document record: {}", storage_id);
        Ok(())
    }

    /// Records of documents saved strictly before the cutoff
    pub fn saved_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<DocRecord>> {
        let mut expired = Vec::new();
        for item in self.docs.iter() {
            let (_, value) = item?;
            let record: DocRecord = serde_json::from_slice(&value)?;
            if record.created_at < cutoff {
                expired.push(record);
            }
        }
        Ok(expired)
    }

    /// Remember when the last sweep ran
    pub fn mark_swept(&self, at: DateTime<Utc>) -> Result<()> {
        self.metadata
            .insert(encode_meta_key(LAST_SWEEP_KEY), at.to_rfc3339().as_bytes())?;
        Ok(())
    }

    /// When the last sweep ran, if ever
    pub fn last_swept(&self) -> Result<Option<DateTime<Utc>>> {
        match self.metadata.get(encode_meta_key(LAST_SWEEP_KEY))? {
            Some(value) => {
                let text = String::from_utf8_lossy(&value);
                Ok(DateTime::parse_from_rfc3339(&text)
                    .ok()
                    .map(|at| at.with_timezone(&Utc)))
            }
            None => Ok(None),
        }
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }

    /// Get internal statistics (for debugging/monitoring)
    pub fn stats(&self) -> Result<LedgerStats> {
        let mut doc_count = 0;
        let mut bytes_total = 0;

        for item in self.docs.iter() {
            let (_, value) = item?;
            let record: DocRecord = serde_json::from_slice(&value)?;
            doc_count += 1;
            bytes_total += record.size_bytes;
        }

        Ok(LedgerStats {
            doc_count,
            bytes_total,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LedgerStats {
    pub doc_count: usize,
    pub bytes_total: u64,
}
