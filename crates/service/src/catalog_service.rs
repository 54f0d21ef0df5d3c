use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bookshelf_core::{Book, BookFilter, BookUpdate, NewBook, SearchMode};
use bookshelf_storage::{BookStore, StorageError};
use serde::Serialize;

use crate::spreadsheet::{self, SpreadsheetError};
use crate::ServiceError;

/// Failure reason for a valid row the store refused; details go to the log.
pub const ROW_NOT_SAVED: &str = "could not be saved";

/// A spreadsheet row that could not be imported.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based spreadsheet row number
    pub row: usize,
    pub reason: String,
}

/// Outcome of one import pass.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    /// Titles inserted, in sheet order
    pub imported: Vec<String>,
    /// Titles skipped because they already existed (in the table or earlier in the sheet)
    pub duplicates: Vec<String>,
    pub failures: Vec<RowFailure>,
}

/// Catalog operations shared by the HTTP handlers and the CLI.
pub struct CatalogService {
    storage: Arc<dyn BookStore>,
    search_mode: SearchMode,
}

/// Helper: run spreadsheet file work on the tokio blocking pool.
async fn blocking<F, T>(f: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, SpreadsheetError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Task(format!("spawn_blocking join error: {e}")))?
        .map_err(ServiceError::from)
}

impl CatalogService {
    #[must_use]
    pub fn new(storage: Arc<dyn BookStore>, search_mode: SearchMode) -> Self {
        Self { storage, search_mode }
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    pub async fn add(&self, book: &NewBook) -> Result<Book, ServiceError> {
        let stored = self.storage.insert_book(book).await?;
        tracing::info!(book_id = stored.id, title = %stored.title, "Book added");
        Ok(stored)
    }

    pub async fn get(&self, id: i64) -> Result<Book, ServiceError> {
        self.storage.get_book(id).await?.ok_or_else(|| {
            ServiceError::Storage(StorageError::NotFound { entity: "book", id: id.to_string() })
        })
    }

    pub async fn update(&self, id: i64, update: &BookUpdate) -> Result<Book, ServiceError> {
        let book = self.storage.update_book(id, update).await?;
        tracing::info!(book_id = id, title = %book.title, "Book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> Result<Book, ServiceError> {
        let book = self.storage.delete_book(id).await?;
        tracing::info!(book_id = id, title = %book.title, "Book deleted");
        Ok(book)
    }

    pub async fn delete_all(&self) -> Result<u64, ServiceError> {
        let removed = self.storage.delete_all_books().await?;
        tracing::warn!(removed, "All books deleted");
        Ok(removed)
    }

    pub async fn list(&self) -> Result<Vec<Book>, ServiceError> {
        Ok(self.storage.list_books().await?)
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.storage.count_books().await?)
    }

    /// Filtered search, or the full list when running in
    /// [`SearchMode::Unfiltered`].
    pub async fn search(&self, filter: &BookFilter) -> Result<Vec<Book>, ServiceError> {
        match self.search_mode {
            SearchMode::Filtered => Ok(self.storage.search_books(filter).await?),
            SearchMode::Unfiltered => self.list().await,
        }
    }

    /// Write every book to an `.xlsx` workbook at `path`. Returns the row count.
    pub async fn export(&self, path: &Path) -> Result<usize, ServiceError> {
        let books = self.list().await?;
        let count = books.len();
        let target = path.to_path_buf();
        blocking(move || spreadsheet::write_books(&target, &books)).await?;
        tracing::info!(path = %path.display(), count, "Exported books");
        Ok(count)
    }

    /// Insert every valid, non-duplicate row of the workbook at `path`.
    ///
    /// Titles are checked against the table as it was before the pass and
    /// against rows already imported by this pass. Bad rows are reported and
    /// skipped; the rest of the sheet is still processed.
    pub async fn import(&self, path: &Path) -> Result<ImportReport, ServiceError> {
        let source: PathBuf = path.to_path_buf();
        let rows = blocking(move || spreadsheet::read_books(&source)).await?;
        let existing = self.storage.titles().await?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut report = ImportReport::default();

        for row in rows {
            let book = match row.book {
                Ok(book) => book,
                Err(reason) => {
                    tracing::warn!(row = row.row_number, %reason, "Skipping invalid import row");
                    report.failures.push(RowFailure { row: row.row_number, reason });
                    continue;
                },
            };

            if existing.contains(book.title()) || seen.contains(book.title()) {
                tracing::warn!(title = book.title(), "Skipping duplicate import row");
                report.duplicates.push(book.title().to_owned());
                continue;
            }

            match self.storage.insert_book(&book).await {
                Ok(stored) => {
                    seen.insert(stored.title.clone());
                    report.imported.push(stored.title);
                },
                Err(e) if e.is_duplicate() => {
                    report.duplicates.push(book.title().to_owned());
                },
                Err(e) => {
                    tracing::error!(
                        row = row.row_number,
                        title = book.title(),
                        error = %e,
                        "Import row not saved"
                    );
                    report.failures.push(RowFailure {
                        row: row.row_number,
                        reason: ROW_NOT_SAVED.to_owned(),
                    });
                },
            }
        }

        tracing::info!(
            path = %path.display(),
            imported = report.imported.len(),
            duplicates = report.duplicates.len(),
            failures = report.failures.len(),
            "Import finished"
        );
        Ok(report)
    }
}
