//! Typed error enum for the service layer.
//!
//! Unifies storage and spreadsheet failures into a single error
//! type so handlers can match on the failure mode.

use bookshelf_storage::StorageError;
use thiserror::Error;

use crate::spreadsheet::SpreadsheetError;

/// Service-layer error unifying storage and spreadsheet failures.
///
/// Book data is validated by the `NewBook`/`BookUpdate` constructors before it
/// reaches the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate title).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Spreadsheet could not be read or written.
    #[error("spreadsheet: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    /// Blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_transient())
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }

    /// Whether this error represents a duplicate title.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }
}
