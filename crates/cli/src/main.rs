//! Merchant Account CLI - credential and account record tools.
//!
//! # Usage
//!
//! ```bash
//! # Generate a fresh salt
//! ma-cli salt
//!
//! # Hash a password with a known salt (password from MA_PASSWORD)
//! MA_PASSWORD=secret ma-cli hash --salt 'q3mN...=='
//!
//! # Check a password against a stored user record
//! MA_PASSWORD=secret ma-cli verify user.json
//!
//! # Print the public view of a stored user record
//! ma-cli inspect user.json --now 2024-02-05T00:00:00Z
//! ```
//!
//! # Commands
//!
//! - `salt` - Print a fresh random salt
//! - `hash` - Derive a stored password hash
//! - `verify` - Authenticate a password against a user record
//! - `inspect` - Print a user record's public view with derived fields

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::{CliConfig, LogFormat};

#[derive(Parser)]
#[command(name = "ma-cli")]
#[command(author, version, about = "Merchant account CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a fresh random salt (base64)
    Salt,
    /// Hash a password with the given salt
    Hash {
        /// Base64 salt, as produced by `salt`
        #[arg(short, long)]
        salt: String,

        /// Plaintext password, for local testing only. It is visible in
        /// process listings and shell history; prefer `MA_PASSWORD`.
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Verify a password against a stored user record
    Verify {
        /// Path to a user record (JSON)
        path: PathBuf,

        /// Plaintext password, for local testing only. It is visible in
        /// process listings and shell history; prefer `MA_PASSWORD`.
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Print the public view of a stored user record
    Inspect {
        /// Path to a user record (JSON)
        path: PathBuf,

        /// Evaluate expiry at this instant (RFC 3339) instead of now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() {
    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn run(cli: Cli, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Salt => commands::credential::salt()?,
        Commands::Hash { salt, password } => {
            let password = commands::credential::resolve_password(password, config)?;
            commands::credential::hash(&salt, &password)?;
        }
        Commands::Verify { path, password } => {
            let password = commands::credential::resolve_password(password, config)?;
            commands::credential::verify(&path, &password)?;
        }
        Commands::Inspect { path, now } => {
            commands::inspect::inspect(&path, now.unwrap_or_else(Utc::now))?;
        }
    }
    Ok(())
}
