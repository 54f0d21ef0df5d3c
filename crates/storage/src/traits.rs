//! Repository trait for the book catalog.

use std::collections::HashSet;

use async_trait::async_trait;
use bookshelf_core::{Book, BookFilter, BookUpdate, NewBook};

use crate::error::StorageError;

/// CRUD and query operations on books.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a book. Fails with `Duplicate` when the exact title already exists.
    async fn insert_book(&self, book: &NewBook) -> Result<Book, StorageError>;

    /// Get book by ID.
    async fn get_book(&self, id: i64) -> Result<Option<Book>, StorageError>;

    /// Overwrite title, author and rating. `NotFound` for an unknown id,
    /// `Duplicate` when another book already has the new title.
    async fn update_book(&self, id: i64, update: &BookUpdate) -> Result<Book, StorageError>;

    /// Delete one book, returning what was removed.
    async fn delete_book(&self, id: i64) -> Result<Book, StorageError>;

    /// Delete every book. Returns the number of rows removed.
    async fn delete_all_books(&self) -> Result<u64, StorageError>;

    /// All books ordered by title.
    async fn list_books(&self) -> Result<Vec<Book>, StorageError>;

    /// Books whose title and author contain the given parts, ordered by title.
    async fn search_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError>;

    /// Every stored title.
    async fn titles(&self) -> Result<HashSet<String>, StorageError>;

    async fn count_books(&self) -> Result<u64, StorageError>;
}
