//! `cachette init` - create a new secrets file.

use tracing::debug;

use super::output;
use crate::core::store::Store;
use crate::core::validation;
use crate::error::Result;

pub fn execute(kms_key_id: &str, raw_context: &[String], path: &str) -> Result<()> {
    validation::validate_new_store_path(path)?;
    let context = validation::parse_context(raw_context)?;

    debug!(path = %path, kms_key_id = %kms_key_id, "creating store");
    let store = Store::new(kms_key_id, context);
    store.save_path(path)?;

    output::success(&format!("created {}", output::name(path)));
    output::kv("master key", kms_key_id);
    Ok(())
}
