//! Field-level validation failures.

use thiserror::Error;

use crate::types::EmailError;

/// A write was rejected because one field is unacceptable.
///
/// These are recovered locally by refusing the write; none of them is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A local account was saved without a password.
    #[error("Password cannot be blank")]
    BlankPassword,

    /// The email address is malformed.
    #[error("Please enter a valid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Another account already uses the email address.
    #[error("E-mail address is already in-use")]
    DuplicateEmail,
}

impl ValidationError {
    /// Name of the stored field the error applies to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::BlankPassword => "hashed_password",
            Self::InvalidEmail(_) | Self::DuplicateEmail => "email",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(ValidationError::BlankPassword.field(), "hashed_password");
        assert_eq!(ValidationError::DuplicateEmail.field(), "email");
        assert_eq!(
            ValidationError::InvalidEmail(EmailError::Empty).field(),
            "email"
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::DuplicateEmail.to_string(),
            "E-mail address is already in-use"
        );
        assert_eq!(
            ValidationError::BlankPassword.to_string(),
            "Password cannot be blank"
        );
    }
}
