//! Custom error types for the authentication crate

use common::StorageError;
use thiserror::Error;

/// Custom error type for authentication operations
#[derive(Error, Debug)]
pub enum AuthError {
    /// The login form input is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The identifier and secret do not match any account
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A login was attempted while a session is active
    #[error("Already signed in")]
    AlreadyAuthenticated,

    /// The authentication provider could not complete the check
    #[error("Authentication provider error: {0}")]
    Provider(String),

    /// The session could not be persisted or removed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
