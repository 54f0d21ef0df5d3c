//! HTML form payloads and their validation rules.
//!
//! Fields arrive as raw strings so an invalid submission can be echoed back
//! into the form unchanged.

use std::collections::BTreeMap;

use bookshelf_core::{parse_rating, Book, BookFilter, BookUpdate, NewBook, ValidationError};
use serde::Deserialize;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_NOT_A_NUMBER: &str = "Not a valid float value.";
pub const MSG_RATING_RANGE: &str = "Enter Between 0.0-10.0";

/// Field name → message shown under that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.insert(field, MSG_REQUIRED);
        }
    }

    fn rating(&mut self, raw: &str) -> Option<f64> {
        match parse_rating(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                self.insert("rating", message_for(&err));
                None
            },
        }
    }
}

impl From<ValidationError> for FormErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = Self::default();
        errors.insert(err.field(), message_for(&err));
        errors
    }
}

fn message_for(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::Required { .. } => MSG_REQUIRED,
        ValidationError::InvalidNumber { .. } => MSG_NOT_A_NUMBER,
        ValidationError::RatingOutOfRange { .. } => MSG_RATING_RANGE,
    }
}

/// Add-book form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub rating: String,
}

impl BookForm {
    pub fn validate(&self) -> Result<NewBook, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("title", &self.title);
        errors.require("author", &self.author);
        match errors.rating(&self.rating) {
            Some(rating) if errors.is_empty() => {
                NewBook::new(&self.title, &self.author, Some(&self.series), rating)
                    .map_err(FormErrors::from)
            },
            _ => Err(errors),
        }
    }
}

/// Edit-book form. Series is shown but not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub rating: String,
}

impl UpdateForm {
    /// Pre-fill from the stored book.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            rating: book.rating.to_string(),
        }
    }

    pub fn validate(&self) -> Result<BookUpdate, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("title", &self.title);
        errors.require("author", &self.author);
        match errors.rating(&self.rating) {
            Some(rating) if errors.is_empty() => {
                BookUpdate::new(&self.title, &self.author, rating).map_err(FormErrors::from)
            },
            _ => Err(errors),
        }
    }
}

/// Search form; both fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

impl SearchForm {
    pub fn filter(&self) -> BookFilter {
        BookFilter::new(Some(&self.title), Some(&self.author))
    }
}
