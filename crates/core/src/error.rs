use thiserror::Error;

/// Rejected user input for a book.
///
/// Produced by the `NewBook`/`BookUpdate` constructors, so a value of either
/// type always satisfies the table constraints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("rating {value} is outside 0.0-10.0")]
    RatingOutOfRange { value: f64 },

    #[error("{field} is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field } | Self::InvalidNumber { field, .. } => field,
            Self::RatingOutOfRange { .. } => "rating",
        }
    }
}
