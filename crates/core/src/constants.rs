//! Shared constants for bookshelf.

/// Lowest accepted rating (inclusive).
pub const RATING_MIN: f64 = 0.0;

/// Highest accepted rating (inclusive).
pub const RATING_MAX: f64 = 10.0;

/// Default SQLite database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://new_books_collection.db";

/// Default location the export route writes to.
pub const DEFAULT_EXPORT_PATH: &str = "static/data.xlsx";

/// Default location the import route reads from.
pub const DEFAULT_IMPORT_PATH: &str = "static/test.xls";

/// Sheet name used by spreadsheet export.
pub const EXPORT_SHEET_NAME: &str = "Books";

/// SQLite connection pool: default maximum connections.
pub const DEFAULT_DB_POOL_SIZE: u32 = 5;

/// SQLite connection pool: acquire timeout in seconds.
pub const DB_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// SQLite busy timeout in seconds.
pub const DB_BUSY_TIMEOUT_SECS: u64 = 30;
