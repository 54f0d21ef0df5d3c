//! Book catalog entry and the validated inputs that create or change one.

use serde::{Deserialize, Serialize};

use crate::constants::{RATING_MAX, RATING_MIN};
use crate::error::ValidationError;

/// One stored catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Database-assigned identifier
    pub id: i64,
    /// Unique title (exact, case-sensitive)
    pub title: String,
    pub author: String,
    /// Optional series name, never changed after creation
    pub series: Option<String>,
    /// Rating within `RATING_MIN..=RATING_MAX`
    pub rating: f64,
}

/// Validated input for inserting a book.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewBook {
    title: String,
    author: String,
    series: Option<String>,
    rating: f64,
}

impl NewBook {
    /// Trims text fields, rejects blank title/author, maps a blank series to
    /// `None` and checks the rating range.
    pub fn new(
        title: &str,
        author: &str,
        series: Option<&str>,
        rating: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required("title", title)?,
            author: required("author", author)?,
            series: optional(series),
            rating: validate_rating(rating)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn series(&self) -> Option<&str> {
        self.series.as_deref()
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }
}

/// Validated input for editing a book. `series` is not editable.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookUpdate {
    title: String,
    author: String,
    rating: f64,
}

impl BookUpdate {
    pub fn new(title: &str, author: &str, rating: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required("title", title)?,
            author: required("author", author)?,
            rating: validate_rating(rating)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }
}

/// Search criteria. Blank parts are dropped, so `BookFilter::default()`
/// matches every book.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl BookFilter {
    pub fn new(title: Option<&str>, author: Option<&str>) -> Self {
        Self { title: optional(title), author: optional(author) }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }
}

/// Checks that `value` lies in the inclusive rating range. NaN is rejected.
pub fn validate_rating(value: f64) -> Result<f64, ValidationError> {
    if (RATING_MIN..=RATING_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::RatingOutOfRange { value })
    }
}

/// Parses and range-checks a rating typed by a user or read from a cell.
pub fn parse_rating(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "rating" });
    }
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::InvalidNumber {
        field: "rating",
        value: trimmed.to_owned(),
    })?;
    validate_rating(value)
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(ToOwned::to_owned)
}
