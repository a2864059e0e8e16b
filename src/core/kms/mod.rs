//! Key-management capability.
//!
//! The cipher and store depend only on the [`KmsClient`] trait: generate a
//! 256-bit data key bound to a master key id and an encryption context, and
//! decrypt a wrapped data key under the same context. The AWS backend lives
//! behind the `aws` feature; [`mock::MockKms`] stands in for tests.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroizing;

use crate::error::{KmsError, Result};

#[cfg(feature = "aws")]
pub mod aws;

pub mod mock;

/// Encryption context bound to a data key as additional authenticated data.
///
/// Values may be present but unset, mirroring the stored representation.
/// A `BTreeMap` keeps serialization order stable.
pub type EncryptionContext = BTreeMap<String, Option<String>>;

/// A data key, in wrapped and plaintext form.
///
/// The plaintext is used once to seal or open a payload and is wiped when
/// dropped. It is never persisted.
pub struct DataKey {
    /// Wrapped form, safe to store alongside the payload it protects.
    pub ciphertext: Vec<u8>,
    /// Raw 256-bit key. Zeroized on drop.
    pub plaintext: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataKey")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("plaintext", &"<redacted>")
            .finish()
    }
}

/// The two operations this crate needs from a key-management service.
///
/// Implemented by the AWS backend and by [`mock::MockKms`]; nothing else in
/// the crate touches a concrete SDK type.
pub trait KmsClient {
    /// Request a fresh 256-bit data key under `key_id`, bound to `context`.
    fn generate_data_key(
        &self,
        key_id: &str,
        context: &EncryptionContext,
    ) -> std::result::Result<DataKey, KmsError>;

    /// Unwrap a data key. `context` must equal the one used at generation
    /// time or the service refuses.
    fn decrypt_data_key(
        &self,
        key_ciphertext: &[u8],
        context: &EncryptionContext,
    ) -> std::result::Result<DataKey, KmsError>;
}

/// Resolve the client for the current build configuration.
///
/// With the `test-kms` feature, setting `CACHETTE_MOCK_KMS` routes the
/// binary to the in-process mock so integration tests can run without
/// credentials.
pub fn default_client() -> Result<Box<dyn KmsClient>> {
    #[cfg(feature = "test-kms")]
    if std::env::var_os("CACHETTE_MOCK_KMS").is_some() {
        tracing::debug!("using mock KMS backend");
        return Ok(Box::new(mock::MockKms::new()));
    }

    backend_client()
}

#[cfg(feature = "aws")]
fn backend_client() -> Result<Box<dyn KmsClient>> {
    Ok(Box::new(aws::AwsKms::new()))
}

#[cfg(not(feature = "aws"))]
fn backend_client() -> Result<Box<dyn KmsClient>> {
    Err(KmsError::NoBackend.into())
}
