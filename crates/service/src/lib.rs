//! Service layer for bookshelf
//!
//! Centralizes catalog rules between the HTTP/CLI front ends and storage.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod catalog_service;
mod error;
pub mod spreadsheet;
#[cfg(test)]
mod tests;

pub use catalog_service::{CatalogService, ImportReport, RowFailure, ROW_NOT_SAVED};
pub use error::ServiceError;
pub use spreadsheet::SpreadsheetError;
