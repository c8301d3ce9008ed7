//! Account service error types.

use thiserror::Error;

use crate::credential::CryptoError;
use crate::db::RepositoryError;
use crate::validation::ValidationError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A field was rejected.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Password reset token is unknown or expired.
    #[error("password reset token is invalid or has expired")]
    InvalidResetToken,

    /// A credential could not be produced.
    #[error("credential error: {0}")]
    Crypto(#[from] CryptoError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AccountError {
    /// Whether this is the duplicate-email rejection, whether caught by the
    /// advisory lookup or by the store's constraint.
    #[must_use]
    pub const fn is_duplicate_email(&self) -> bool {
        matches!(self, Self::Validation(ValidationError::DuplicateEmail))
    }
}
