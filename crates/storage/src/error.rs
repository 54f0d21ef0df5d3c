//! Typed error enum for the storage layer.
//!
//! Lets callers match on specific failure modes (not found, duplicate title,
//! database failure) instead of downcasting opaque boxes.

use thiserror::Error;

/// `SQLITE_BUSY`, `SQLITE_LOCKED`, `SQLITE_BUSY_SNAPSHOT` and `SQLITE_LOCKED_SHAREDCACHE`.
const SQLITE_BUSY_CODES: [&str; 4] = ["5", "6", "517", "262"];

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Another book already uses this title.
    #[error("duplicate title: {0}")]
    Duplicate(String),

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Schema bootstrap failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    pub(crate) fn book_not_found(id: i64) -> Self {
        Self::NotFound { entity: "book", id: id.to_string() }
    }

    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => true,
            Self::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().is_some_and(|code| SQLITE_BUSY_CODES.contains(&code.as_ref()))
            },
            _ => false,
        }
    }

    /// Whether this error is a title collision.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Custom `From<sqlx::Error>`, NOT blanket `#[from]`.
///
/// - `RowNotFound` → `NotFound` (generic; callers remap with entity context)
/// - unique constraint violation → `Duplicate`
/// - Everything else → `Database`
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound { entity: "row", id: "unknown".into() },
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Duplicate(db_err.message().to_owned())
            },
            _ => Self::Database(err),
        }
    }
}
