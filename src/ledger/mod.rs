//! Fjall-based persistence layer for stored-document records
//!
//! Every save writes a [`DocRecord`] here keyed by storage id, so the
//! service can answer what a document is (type, size, age) without
//! touching the blob itself, and so sweeps can find expired documents
//! without listing the store.
//!
//! Retention is decided by the caller: `saved_before(cutoff)` returns
//! candidates and the service deletes them, recording the pass with
//! `mark_swept`.

pub mod error;
pub mod partitions;
pub mod store;

pub use error::{LedgerError, Result};
pub use store::{DocRecord, FjallLedger, LedgerStats};
