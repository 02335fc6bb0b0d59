use thiserror::Error;

use crate::handlers::HandlerError;
use crate::ledger::LedgerError;
use crate::schema::SchemaViolation;
use crate::storage::StorageError;

/// Lifecycle hook a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    PreSave,
    PostSave,
    PreLoad,
    PostLoad,
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Hook::PreSave => "pre_save",
            Hook::PostSave => "post_save",
            Hook::PreLoad => "pre_load",
            Hook::PostLoad => "post_load",
        };
        f.write_str(name)
    }
}

/// Whether the caller or the service is at fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Client,
    Server,
}

/// Service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown document type: {0}")]
    UnknownType(String),

    #[error("document rejected by {type_key} handler: {reason}")]
    Rejected { type_key: String, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error("document too large: {size} bytes exceeds limit of {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("no document {id}")]
    NotFound { id: String },

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("{hook} hook failed: {message}")]
    Processing { hook: Hook, message: String },

    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),
}

impl ServiceError {
    /// Map a handler hook failure onto the service taxonomy.
    pub fn from_handler(hook: Hook, type_key: &str, err: HandlerError) -> Self {
        match err {
            HandlerError::Rejected(reason) => ServiceError::Rejected {
                type_key: type_key.to_string(),
                reason,
            },
            HandlerError::Schema(violation) => ServiceError::Schema(violation),
            HandlerError::NotFound(id) => ServiceError::NotFound { id },
            HandlerError::Processing(message) => ServiceError::Processing { hook, message },
        }
    }

    /// Coarse fault classification, Client for caller mistakes and
    /// Server for infrastructure failures.
    pub fn class(&self) -> ErrorClass {
        match self {
            ServiceError::UnknownType(_)
            | ServiceError::Rejected { .. }
            | ServiceError::Schema(_)
            | ServiceError::TooLarge { .. }
            | ServiceError::NotFound { .. } => ErrorClass::Client,
            ServiceError::Storage(StorageError::NotFound(_) | StorageError::InvalidId(_)) => {
                ErrorClass::Client
            }
            ServiceError::Storage(_)
            | ServiceError::Processing { .. }
            | ServiceError::Ledger(_) => ErrorClass::Server,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::UnknownType(_) => "UNKNOWN_TYPE",
            ServiceError::Rejected { .. } => "DOCUMENT_REJECTED",
            ServiceError::Schema(_) => "SCHEMA_VIOLATION",
            ServiceError::TooLarge { .. } => "DOCUMENT_TOO_LARGE",
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::Storage(StorageError::NotFound(_) | StorageError::InvalidId(_)) => {
                "NOT_FOUND"
            }
            ServiceError::Storage(_) => "STORAGE_FAILURE",
            ServiceError::Processing { .. } => "PROCESSING_FAILURE",
            ServiceError::Ledger(_) => "LEDGER_FAILURE",
        }
    }
}
