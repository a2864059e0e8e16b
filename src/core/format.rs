//! Output formatters for decrypted secrets.
//!
//! Bash and dotenv render line-per-secret with uppercased names; JSON and
//! YAML render a single name→value document with the original names. All
//! four are deterministic for a given input order.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{FormatError, Result};

/// Export format selected on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Bash,
    Dotenv,
    Json,
    Yaml,
}

/// Single-quote a value for POSIX shells: closes the quote, emits an
/// escaped quote, reopens. Safe for any byte sequence except NUL.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render `items` to `out` in the requested format.
pub fn render(format: Format, out: &mut dyn Write, items: &[(String, String)]) -> Result<()> {
    match format {
        Format::Bash => {
            for (name, plaintext) in items {
                writeln!(
                    out,
                    "export {}={}",
                    name.to_uppercase(),
                    shell_quote(plaintext)
                )?;
            }
        }
        Format::Dotenv => {
            for (name, plaintext) in items {
                writeln!(out, "{}={}", name.to_uppercase(), shell_quote(plaintext))?;
            }
        }
        Format::Json => {
            let map: BTreeMap<&str, &str> = items
                .iter()
                .map(|(n, p)| (n.as_str(), p.as_str()))
                .collect();
            let rendered = serde_json::to_string_pretty(&map).map_err(FormatError::Json)?;
            writeln!(out, "{}", rendered)?;
        }
        Format::Yaml => {
            let map: BTreeMap<&str, &str> = items
                .iter()
                .map(|(n, p)| (n.as_str(), p.as_str()))
                .collect();
            let rendered = serde_yaml::to_string(&map).map_err(FormatError::Yaml)?;
            write!(out, "{}", rendered)?;
        }
    }

    Ok(())
}
