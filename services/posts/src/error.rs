//! Custom error types for the posts client

use thiserror::Error;

/// Outcome of a failed posts operation
#[derive(Error, Debug)]
pub enum PostError {
    /// Backend unreachable, timed out, or answered without a structured body
    #[error("Could not reach the posts service during {operation}: {detail}")]
    Connectivity {
        operation: &'static str,
        detail: String,
    },

    /// Field-level validation messages, shown to the user verbatim
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The requested post does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered with a structured failure that is neither of the above
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl PostError {
    pub(crate) fn connectivity(operation: &'static str, detail: impl ToString) -> Self {
        PostError::Connectivity {
            operation,
            detail: detail.to_string(),
        }
    }

    /// Whether retrying the same call could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, PostError::Connectivity { .. })
    }

    /// Field messages carried by a validation failure
    pub fn field_messages(&self) -> &[String] {
        match self {
            PostError::Validation(messages) => messages,
            _ => &[],
        }
    }
}

/// Type alias for posts client results
pub type PostResult<T> = Result<T, PostError>;
