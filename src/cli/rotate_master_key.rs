//! `cachette rotate-master-key` - re-encrypt every secret under a new
//! master key.
//!
//! The store only changes if every secret re-encrypts; a failure leaves the
//! file exactly as it was.

use super::output;
use crate::core::kms;
use crate::core::store::Store;
use crate::core::validation;
use crate::error::Result;

pub fn execute(new_kms_key_id: &str, path: &str) -> Result<()> {
    validation::validate_store_path(path)?;

    let mut store = Store::load_path(path)?;
    let kms = kms::default_client()?;

    store.rotate_master_key(&*kms, new_kms_key_id)?;
    store.save_path(path)?;

    output::success(&format!(
        "re-encrypted {} secrets under {}",
        store.secrets.len(),
        output::name(new_kms_key_id)
    ));
    Ok(())
}
