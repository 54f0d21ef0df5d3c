//! Catalog service tests against a temporary SQLite file.

#![allow(clippy::unwrap_used, reason = "test code")]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_core::{Book, BookFilter, BookUpdate, NewBook, SearchMode};
use bookshelf_storage::{BookStore, SqliteStorage, StorageError};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use crate::{CatalogService, RowFailure, ServiceError, SpreadsheetError, ROW_NOT_SAVED};

async fn create_test_service(mode: SearchMode) -> (CatalogService, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = SqliteStorage::open(&temp_dir.path().join("test.db")).await.unwrap();
    (CatalogService::new(Arc::new(storage), mode), temp_dir)
}

fn book(title: &str, author: &str, series: Option<&str>, rating: f64) -> NewBook {
    NewBook::new(title, author, series, rating).unwrap()
}

/// Store whose inserts fail with a database error for one title.
struct FailingInsertStore {
    inner: SqliteStorage,
    failing_title: &'static str,
}

#[async_trait]
impl BookStore for FailingInsertStore {
    async fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError> {
        if book.title() == self.failing_title {
            return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.insert_book(book).await
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, StorageError> {
        self.inner.get_book(id).await
    }

    async fn update_book(&self, id: i64, update: &BookUpdate) -> Result<Book, StorageError> {
        self.inner.update_book(id, update).await
    }

    async fn delete_book(&self, id: i64) -> Result<Book, StorageError> {
        self.inner.delete_book(id).await
    }

    async fn delete_all_books(&self) -> Result<u64, StorageError> {
        self.inner.delete_all_books().await
    }

    async fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        self.inner.list_books().await
    }

    async fn search_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError> {
        self.inner.search_books(filter).await
    }

    async fn titles(&self) -> Result<HashSet<String>, StorageError> {
        self.inner.titles().await
    }

    async fn count_books(&self) -> Result<u64, StorageError> {
        self.inner.count_books().await
    }
}

/// Write a single-sheet workbook from string cells; `None` leaves a cell blank.
fn write_sheet(path: &Path, rows: &[&[Option<&str>]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in (0u32..).zip(rows) {
        for (c, cell) in (0u16..).zip(row.iter()) {
            if let Some(value) = cell {
                sheet.write_string(r, c, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

#[tokio::test]
async fn duplicate_add_leaves_table_unchanged() {
    let (service, _temp_dir) = create_test_service(SearchMode::Filtered).await;
    service.add(&book("Dune", "Frank Herbert", None, 9.0)).await.unwrap();

    let err = service.add(&book("Dune", "Other Author", None, 5.0)).await.unwrap_err();
    assert!(err.is_duplicate());

    let books = service.list().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].author, "Frank Herbert");
    assert_eq!(books[0].series, None);
    assert_eq!(books[0].rating, 9.0);
}

#[tokio::test]
async fn get_unknown_book_is_not_found() {
    let (service, _temp_dir) = create_test_service(SearchMode::Filtered).await;
    let err = service.get(7).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn update_is_reflected_in_list() {
    let (service, _temp_dir) = create_test_service(SearchMode::Filtered).await;
    let dune = service.add(&book("Dune", "Frank Herbert", None, 9.0)).await.unwrap();
    service.add(&book("Hyperion", "Dan Simmons", None, 8.0)).await.unwrap();

    let update = BookUpdate::new("Dune", "Frank Herbert", 9.5).unwrap();
    service.update(dune.id, &update).await.unwrap();

    let books = service.list().await.unwrap();
    assert_eq!(books[0].rating, 9.5);
    assert_eq!(books[1].rating, 8.0);
}

#[tokio::test]
async fn delete_unknown_id_reports_not_found() {
    let (service, _temp_dir) = create_test_service(SearchMode::Filtered).await;
    service.add(&book("Dune", "Frank Herbert", None, 9.0)).await.unwrap();
    assert!(service.delete(999).await.unwrap_err().is_not_found());
    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_all_empties_catalog() {
    let (service, _temp_dir) = create_test_service(SearchMode::Filtered).await;
    service.add(&book("Dune", "Frank Herbert", None, 9.0)).await.unwrap();
    service.add(&book("Hyperion", "Dan Simmons", None, 8.0)).await.unwrap();
    assert_eq!(service.delete_all().await.unwrap(), 2);
    assert!(service.list().await.unwrap().is_empty());
    assert_eq!(service.count().await.unwrap(), 0);
}

#[tokio::test]
async fn search_mode_controls_filtering() {
    let (filtered, _dir_a) = create_test_service(SearchMode::Filtered).await;
    let (legacy, _dir_b) = create_test_service(SearchMode::Unfiltered).await;
    for service in [&filtered, &legacy] {
        service.add(&book("Dune", "Frank Herbert", None, 9.0)).await.unwrap();
        service.add(&book("Hyperion", "Dan Simmons", None, 8.0)).await.unwrap();
    }

    let filter = BookFilter::new(None, Some("Simmons"));
    let found = filtered.search(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Hyperion");

    assert_eq!(legacy.search(&filter).await.unwrap().len(), 2);
}

#[tokio::test]
async fn export_then_import_reproduces_catalog() {
    let (source, temp_dir) = create_test_service(SearchMode::Filtered).await;
    source.add(&book("Dune", "Frank Herbert", Some("Dune Chronicles"), 9.0)).await.unwrap();
    source.add(&book("Hyperion", "Dan Simmons", None, 8.0)).await.unwrap();
    source.add(&book("1984", "George Orwell", None, 0.0)).await.unwrap();

    let path = temp_dir.path().join("exports/books.xlsx");
    assert_eq!(source.export(&path).await.unwrap(), 3);
    assert!(path.exists());

    let (target, _target_dir) = create_test_service(SearchMode::Filtered).await;
    let report = target.import(&path).await.unwrap();
    assert_eq!(report.imported.len(), 3);
    assert!(report.duplicates.is_empty());
    assert!(report.failures.is_empty());

    let tuples = |books: Vec<bookshelf_core::Book>| {
        books
            .into_iter()
            .map(|b| (b.title, b.author, b.series, b.rating.to_string()))
            .collect::<Vec<_>>()
    };
    assert_eq!(tuples(target.list().await.unwrap()), tuples(source.list().await.unwrap()));
}

#[tokio::test]
async fn export_overwrites_existing_file() {
    let (service, temp_dir) = create_test_service(SearchMode::Filtered).await;
    let path = temp_dir.path().join("data.xlsx");
    service.add(&book("Dune", "Frank Herbert", None, 9.0)).await.unwrap();
    service.export(&path).await.unwrap();
    service.delete_all().await.unwrap();
    assert_eq!(service.export(&path).await.unwrap(), 0);

    let report = service.import(&path).await.unwrap();
    assert!(report.imported.is_empty());
}

#[tokio::test]
async fn import_skips_existing_and_intra_batch_duplicates() {
    let (service, temp_dir) = create_test_service(SearchMode::Filtered).await;
    service.add(&book("Dune", "Frank Herbert", None, 9.0)).await.unwrap();

    let path = temp_dir.path().join("import.xlsx");
    write_sheet(
        &path,
        &[
            &[Some("rating"), Some("title"), Some("author"), Some("series")],
            &[Some("5"), Some("Dune"), Some("Other Author"), None],
            &[Some("8"), Some("Hyperion"), Some("Dan Simmons"), Some("Cantos")],
            &[Some("7"), Some("Hyperion"), Some("Someone Else"), None],
        ],
    );

    let report = service.import(&path).await.unwrap();
    assert_eq!(report.imported, ["Hyperion"]);
    assert_eq!(report.duplicates, ["Dune", "Hyperion"]);

    let books = service.list().await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].author, "Frank Herbert");
    assert_eq!(books[1].series.as_deref(), Some("Cantos"));
}

#[tokio::test]
async fn import_reports_bad_rows_and_continues() {
    let (service, temp_dir) = create_test_service(SearchMode::Filtered).await;
    let path = temp_dir.path().join("import.xlsx");
    write_sheet(
        &path,
        &[
            &[Some("author"), Some("title"), Some("series"), Some("rating")],
            &[Some("Frank Herbert"), Some("Dune"), None, Some("nine")],
            &[None, None, None, None],
            &[Some("Dan Simmons"), Some("Hyperion"), None, Some("10.1")],
            &[None, Some("Anonymous"), None, Some("3")],
            &[Some("William Gibson"), Some("Neuromancer"), None, Some("10")],
        ],
    );

    let report = service.import(&path).await.unwrap();
    assert_eq!(report.imported, ["Neuromancer"]);
    let failed_rows: Vec<usize> = report.failures.iter().map(|f| f.row).collect();
    assert_eq!(failed_rows, [2, 4, 5]);
    assert_eq!(
        report.failures[2],
        RowFailure { row: 5, reason: "author is required".to_owned() }
    );
    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn import_of_missing_file_fails_without_changes() {
    let (service, temp_dir) = create_test_service(SearchMode::Filtered).await;
    service.add(&book("Dune", "Frank Herbert", None, 9.0)).await.unwrap();

    let err = service.import(&temp_dir.path().join("missing.xls")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Spreadsheet(SpreadsheetError::Read(_))));
    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn import_reports_storage_failure_per_row_and_continues() {
    let temp_dir = TempDir::new().unwrap();
    let inner = SqliteStorage::open(&temp_dir.path().join("test.db")).await.unwrap();
    let store = FailingInsertStore { inner, failing_title: "Hyperion" };
    let service = CatalogService::new(Arc::new(store), SearchMode::Filtered);

    let path = temp_dir.path().join("import.xlsx");
    write_sheet(
        &path,
        &[
            &[Some("title"), Some("author"), Some("rating")],
            &[Some("Dune"), Some("Frank Herbert"), Some("9")],
            &[Some("Hyperion"), Some("Dan Simmons"), Some("8")],
            &[Some("Neuromancer"), Some("William Gibson"), Some("7")],
        ],
    );

    let report = service.import(&path).await.unwrap();
    assert_eq!(report.imported, ["Dune", "Neuromancer"]);
    assert_eq!(report.failures, [RowFailure { row: 3, reason: ROW_NOT_SAVED.to_owned() }]);
    assert_eq!(service.count().await.unwrap(), 2);
}
