//! `cachette import` - bulk-add secrets from a dotenv file.
//!
//! Keys are lowercased to the store's naming convention; entries whose name
//! is already present are skipped with a warning so an import can be
//! re-run safely.

use std::fs;

use super::output;
use crate::core::kms;
use crate::core::store::Store;
use crate::core::validation;
use crate::error::Result;

pub fn execute(file: &str, path: &str) -> Result<()> {
    validation::validate_store_path(path)?;

    let mut store = Store::load_path(path)?;
    let kms = kms::default_client()?;

    let contents = fs::read_to_string(file)?;
    let mut added = 0usize;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let name = key.trim().to_lowercase();
        let value = value.trim().trim_matches('"').trim_matches('\'');

        validation::validate_name(&name)?;

        if store.contains(&name) {
            output::warn(&format!("skipping {}: already exists (use `rotate`)", name));
            continue;
        }

        store.add(&*kms, value, &name, "")?;
        added += 1;
    }

    store.save_path(path)?;
    output::success(&format!("imported {} secrets into {}", added, output::name(path)));
    Ok(())
}
