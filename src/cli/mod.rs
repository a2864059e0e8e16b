//! Command-line interface.

pub mod add;
pub mod completions;
pub mod export;
pub mod import;
pub mod init;
pub mod output;
pub mod rotate;
pub mod rotate_master_key;

use std::io::Read;

use clap::{Parser, Subcommand};

use crate::core::format::Format;
use crate::error::Result;

/// Default location of the secrets file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = ".secrets.json";

/// Cachette - KMS-backed envelope encryption for a file of named secrets.
#[derive(Parser)]
#[command(
    name = "cachette",
    about = "Manage a file of secrets encrypted against a cloud KMS",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a new secrets file
    Init {
        /// Master key for this file: key ARN, alias ARN, key id, or alias name
        #[arg(long)]
        kms_key_id: String,

        /// Context pair stored with every data key (repeatable)
        #[arg(long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,

        /// Path of the secrets file
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        path: String,
    },

    /// Encrypt a secret read from stdin and append it
    Add {
        /// Secret name (lowercase letters, digits, underscores)
        name: String,

        /// What the secret is for, how to rotate it, ...
        #[arg(long, default_value = "")]
        description: String,

        /// Path of the secrets file
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        path: String,
    },

    /// Replace a secret's value with one read from stdin
    Rotate {
        /// Secret name
        name: String,

        /// Path of the secrets file
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        path: String,
    },

    /// Re-encrypt every secret under a new master key
    RotateMasterKey {
        /// The new master key id
        new_kms_key_id: String,

        /// Path of the secrets file
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        path: String,
    },

    /// Print every secret, decrypted
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "bash")]
        format: Format,

        /// Path of the secrets file
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        path: String,
    },

    /// Add every entry of a dotenv file as a secret
    Import {
        /// Path to the dotenv file
        file: String,

        /// Path of the secrets file
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        path: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a command.
pub fn execute(command: Command) -> Result<()> {
    use Command::*;

    match command {
        Init {
            kms_key_id,
            context,
            path,
        } => init::execute(&kms_key_id, &context, &path),
        Add {
            name,
            description,
            path,
        } => add::execute(&name, &description, &path),
        Rotate { name, path } => rotate::execute(&name, &path),
        RotateMasterKey {
            new_kms_key_id,
            path,
        } => rotate_master_key::execute(&new_kms_key_id, &path),
        Export { format, path } => export::execute(format, &path),
        Import { file, path } => import::execute(&file, &path),
        Completions { shell } => completions::execute(shell),
    }
}

/// Read a secret value from stdin, trimming surrounding whitespace.
///
/// Prints instructions when stdin is a terminal; stays silent for pipes so
/// `echo value | cachette add name` composes.
pub(crate) fn read_secret_value() -> Result<String> {
    if atty::is(atty::Stream::Stdin) {
        println!("Enter the secret value, then press Enter and Ctrl+D:");
    }

    let mut value = String::new();
    std::io::stdin().read_to_string(&mut value)?;
    Ok(value.trim().to_string())
}
