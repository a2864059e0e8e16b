//! Shared CLI output helpers.
//!
//! Color scheme (the `console` crate respects NO_COLOR):
//! - Green: success
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: hints, names, paths
//! - Dimmed: labels

use std::fmt::Display;

use console::style;

/// Print a success message with checkmark.
///
/// Example: `✓ added secret db_password`
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red(), msg);
}

/// Print a warning message.
pub fn warn(msg: &str) {
    println!("{} {}", style("⚠").yellow(), msg);
}

/// Print a hint message.
///
/// Example: `→ run: cachette rotate`
pub fn hint(msg: &str) {
    println!("{} {}", style("→").cyan(), style(msg).cyan());
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  master key  alias/production`
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", style(label).dim(), style(value.to_string()).bold());
}

/// Format a secret or file name for inline use.
pub fn name(n: &str) -> String {
    style(n).cyan().to_string()
}
