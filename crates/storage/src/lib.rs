//! Storage layer for bookshelf
//!
//! SQLite-backed `books` table behind the [`BookStore`] repository trait.

pub mod error;
mod migrations;
mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use sqlite::SqliteStorage;
pub use traits::BookStore;
