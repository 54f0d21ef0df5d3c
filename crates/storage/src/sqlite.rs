//! `SQLite` storage backend using sqlx.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr as _;
use std::time::Duration;

use async_trait::async_trait;
use bookshelf_core::{
    Book, BookFilter, BookUpdate, NewBook, DB_BUSY_TIMEOUT_SECS, DB_POOL_ACQUIRE_TIMEOUT_SECS,
    DEFAULT_DB_POOL_SIZE,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::traits::BookStore;

const BOOK_COLUMNS: &str = "id, title, author, series, rating";

/// Connection pool over the `books` table.
#[derive(Clone, Debug)]
pub struct SqliteStorage {
    pub(crate) pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect with a sqlx URL such as `sqlite://books.db`. The file is created
    /// when missing and the schema is bootstrapped.
    pub async fn connect(database_url: &str, pool_size: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?;
        Self::with_options(options, pool_size).await
    }

    /// Open a database file directly.
    pub async fn open(db_path: &Path) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new().filename(db_path);
        Self::with_options(options, DEFAULT_DB_POOL_SIZE).await
    }

    async fn with_options(
        options: SqliteConnectOptions,
        pool_size: u32,
    ) -> Result<Self, StorageError> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(DB_BUSY_TIMEOUT_SECS));
        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .acquire_timeout(Duration::from_secs(DB_POOL_ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await?;
        run_migrations(&pool).await?;
        tracing::info!(pool_size, "Storage initialized with connection pool");
        Ok(Self { pool })
    }
}

fn row_to_book(row: &SqliteRow) -> Result<Book, StorageError> {
    Ok(Book {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        series: row.try_get("series")?,
        rating: row.try_get("rating")?,
    })
}

/// A unique violation on `books.title` reported against the title being written.
fn title_conflict(err: sqlx::Error, title: &str) -> StorageError {
    match StorageError::from(err) {
        StorageError::Duplicate(_) => StorageError::Duplicate(title.to_owned()),
        other => other,
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn contains_pattern(part: Option<&str>) -> Option<String> {
    part.map(|p| format!("%{}%", escape_like(p)))
}

#[async_trait]
impl BookStore for SqliteStorage {
    async fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        let sql = format!(
            "INSERT INTO books (title, author, series, rating) VALUES (?1, ?2, ?3, ?4)
             RETURNING {BOOK_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(book.title())
            .bind(book.author())
            .bind(book.series())
            .bind(book.rating())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| title_conflict(e, book.title()))?;
        let stored = row_to_book(&row)?;

        tracing::debug!(book_id = stored.id, title = %stored.title, "Inserted book");
        Ok(stored)
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, StorageError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_book).transpose()
    }

    async fn update_book(&self, id: i64, update: &BookUpdate) -> Result<Book, StorageError> {
        let sql = format!(
            "UPDATE books SET title = ?1, author = ?2, rating = ?3 WHERE id = ?4
             RETURNING {BOOK_COLUMNS}"
        );
        sqlx::query(&sql)
            .bind(update.title())
            .bind(update.author())
            .bind(update.rating())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| title_conflict(e, update.title()))?
            .as_ref()
            .map(row_to_book)
            .transpose()?
            .ok_or_else(|| StorageError::book_not_found(id))
    }

    async fn delete_book(&self, id: i64) -> Result<Book, StorageError> {
        let sql = format!("DELETE FROM books WHERE id = ?1 RETURNING {BOOK_COLUMNS}");
        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(row_to_book)
            .transpose()?
            .ok_or_else(|| StorageError::book_not_found(id))
    }

    async fn delete_all_books(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM books").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY title ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_book).collect()
    }

    async fn search_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError> {
        if filter.is_empty() {
            return self.list_books().await;
        }
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM books
               WHERE (?1 IS NULL OR title LIKE ?1 ESCAPE '\\')
                 AND (?2 IS NULL OR author LIKE ?2 ESCAPE '\\')
               ORDER BY title ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(contains_pattern(filter.title.as_deref()))
            .bind(contains_pattern(filter.author.as_deref()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_book).collect()
    }

    async fn titles(&self) -> Result<HashSet<String>, StorageError> {
        let titles: Vec<String> =
            sqlx::query_scalar("SELECT title FROM books").fetch_all(&self.pool).await?;
        Ok(titles.into_iter().collect())
    }

    async fn count_books(&self) -> Result<u64, StorageError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books").fetch_one(&self.pool).await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}
