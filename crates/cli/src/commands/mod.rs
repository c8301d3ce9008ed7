//! CLI command implementations.

pub mod credential;
pub mod inspect;

use std::path::Path;

use merchant_account_core::User;
use thiserror::Error;

/// Errors from reading a stored user record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid user record in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Load a user record from a JSON file.
pub fn load_user(path: &Path) -> Result<User, RecordError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| RecordError::Parse {
        path: display,
        source,
    })
}
