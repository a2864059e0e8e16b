//! Cachette - KMS-backed envelope encryption for a file of named secrets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cachette::cli::{execute, output, Cli};
use cachette::error::{Error, KmsError, StoreError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("CACHETTE_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("cachette=debug")
        } else {
            EnvFilter::new("cachette=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command) {
        let suggestion = match &e {
            Error::Store(StoreError::NotFound(_)) => Some("run: cachette add"),
            Error::Store(StoreError::DuplicateName(_)) => Some("run: cachette rotate"),
            Error::Kms(KmsError::NoBackend) => Some("reinstall with: cargo install cachette --features aws"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
