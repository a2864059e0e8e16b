//! `cachette export` - print every secret, decrypted.

use std::io::{self, Write};

use crate::core::format::{self, Format};
use crate::core::kms;
use crate::core::store::Store;
use crate::core::validation;
use crate::error::Result;

pub fn execute(format: Format, path: &str) -> Result<()> {
    validation::validate_store_path(path)?;

    let store = Store::load_path(path)?;
    let kms = kms::default_client()?;

    // The first decryption failure aborts the export; partial output would
    // be indistinguishable from a complete one.
    let items = store
        .export_plaintext(&*kms)
        .collect::<Result<Vec<_>>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    format::render(format, &mut out, &items)?;
    out.flush()?;
    Ok(())
}
