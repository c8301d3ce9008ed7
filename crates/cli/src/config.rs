//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MA_LOG` - Tracing filter directive (default: info)
//! - `MA_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `MA_PASSWORD` - Plaintext password for `hash` and `verify` when
//!   `--password` is not given

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// CLI configuration.
///
/// `Debug` is derived: `SecretString` already redacts itself.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Tracing filter directive
    pub log_filter: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Password supplied through the environment
    pub password: Option<SecretString>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let log_filter = get_env_or_default("MA_LOG", "info");
        let log_format = parse_log_format(&get_env_or_default("MA_LOG_FORMAT", "pretty"))?;
        let password = get_optional_env("MA_PASSWORD").map(SecretString::from);

        Ok(Self {
            log_filter,
            log_format,
            password,
        })
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "pretty" | "" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(ConfigError::InvalidEnvVar(
            "MA_LOG_FORMAT".to_owned(),
            format!("expected `pretty` or `json`, got `{other}`"),
        )),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_owned())
}
