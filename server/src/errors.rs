use thiserror::Error;

use crate::validation::ValidationError;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents a submission that failed validation.
    #[error("{0}")]
    InvalidRecipe(#[from] ValidationError),

    /// Represents an ID that could not be parsed.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// Represents an error caused by an unreadable form submission.
    #[error("malformed form submission")]
    MalformedFormSubmission,

    /// Represents an error writing an uploaded image.
    #[error("failed to save image")]
    ImageSaveFailed { source: std::io::Error },

    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },
}
