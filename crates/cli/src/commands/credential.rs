//! Credential commands: salt, hash, verify.

use std::path::Path;

use merchant_account_core::credential::{self, CryptoError};
use secrecy::ExposeSecret;
use thiserror::Error;

use super::{RecordError, load_user};
use crate::config::CliConfig;

/// Errors from credential commands.
#[derive(Debug, Error)]
pub enum CredentialCommandError {
    #[error("No password given: pass --password or set MA_PASSWORD")]
    MissingPassword,

    #[error("Password cannot be blank")]
    BlankPassword,

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Password does not match {0}")]
    Mismatch(String),
}

/// Pick the `--password` argument, else `MA_PASSWORD`.
///
/// The argument is visible in process listings and shell history, so using
/// it logs a warning.
pub fn resolve_password(
    arg: Option<String>,
    config: &CliConfig,
) -> Result<String, CredentialCommandError> {
    if arg.is_some() {
        tracing::warn!("--password is for local testing; prefer MA_PASSWORD");
    }
    arg.or_else(|| {
        config
            .password
            .as_ref()
            .map(|p| p.expose_secret().to_owned())
    })
    .ok_or(CredentialCommandError::MissingPassword)
}

/// Print a fresh salt.
pub fn salt() -> Result<(), CredentialCommandError> {
    let salt = credential::make_salt()?;

    #[allow(clippy::print_stdout)]
    {
        println!("{salt}");
    }
    Ok(())
}

/// Print the stored hash of `password` under `salt`.
pub fn hash(salt: &str, password: &str) -> Result<(), CredentialCommandError> {
    if password.is_empty() {
        return Err(CredentialCommandError::BlankPassword);
    }
    let hashed = credential::hash_password(password, salt)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{hashed}");
    }
    Ok(())
}

/// Authenticate `password` against the record at `path`.
///
/// A mismatch is an error so the process exits non-zero.
pub fn verify(path: &Path, password: &str) -> Result<(), CredentialCommandError> {
    let user = load_user(path)?;

    if !user.authenticate(password) {
        return Err(CredentialCommandError::Mismatch(user.email.to_string()));
    }

    tracing::info!(email = %user.email, "Password verified");

    #[allow(clippy::print_stdout)]
    {
        println!("ok");
    }
    Ok(())
}
