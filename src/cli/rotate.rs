//! `cachette rotate` - replace one secret's value under a fresh data key.

use super::output;
use crate::core::kms;
use crate::core::store::Store;
use crate::core::validation;
use crate::error::{Result, StoreError};

pub fn execute(name: &str, path: &str) -> Result<()> {
    validation::validate_store_path(path)?;
    validation::validate_name(name)?;

    let mut store = Store::load_path(path)?;
    if !store.contains(name) {
        // Fail before prompting for a value that could never be used.
        return Err(StoreError::NotFound(name.to_string()).into());
    }

    let kms = kms::default_client()?;
    let plaintext = super::read_secret_value()?;

    store.rotate(&*kms, name, &plaintext)?;
    store.save_path(path)?;

    output::success(&format!("rotated secret {}", output::name(name)));
    Ok(())
}
