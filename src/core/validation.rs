//! Input validation for store operations.
//!
//! Validates secret names, context pairs from the command line, and store
//! file paths.

use std::path::Path;

use crate::core::kms::EncryptionContext;
use crate::error::{Result, ValidationError};

/// Validate a secret name.
///
/// Names become environment variables on export, so they must be usable
/// from a shell:
/// - only a-z, 0-9, and underscore
/// - cannot start with a digit
/// - cannot be empty
pub fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return Err(ValidationError::InvalidName(name.to_string()).into()),
    }

    for c in chars {
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '_' {
            return Err(ValidationError::InvalidName(name.to_string()).into());
        }
    }

    Ok(())
}

/// Parse `KEY=VALUE` pairs from the command line into an encryption
/// context. Values may contain `=`; only the first one splits.
pub fn parse_context(raw: &[String]) -> Result<EncryptionContext> {
    let mut context = EncryptionContext::new();

    for item in raw {
        let (key, value) = item
            .split_once('=')
            .ok_or_else(|| ValidationError::InvalidContext(item.to_string()))?;
        if key.is_empty() {
            return Err(ValidationError::InvalidContext(item.to_string()).into());
        }
        context.insert(key.to_string(), Some(value.to_string()));
    }

    Ok(context)
}

/// Check that a store file exists at `path` and is not a directory.
pub fn validate_store_path(path: &str) -> Result<()> {
    let p = Path::new(path);

    if path.is_empty() || !p.exists() {
        return Err(ValidationError::MissingFile(path.to_string()).into());
    }
    if p.is_dir() {
        return Err(ValidationError::IsDirectory(path.to_string()).into());
    }

    Ok(())
}

/// Check that nothing exists yet at `path`, for `init`.
pub fn validate_new_store_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ValidationError::MissingFile(path.to_string()).into());
    }
    if Path::new(path).exists() {
        return Err(ValidationError::FileExists(path.to_string()).into());
    }

    Ok(())
}
