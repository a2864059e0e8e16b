//! In-process fake of the key-management capability.
//!
//! NOT cryptographically secure: the "wrapped" form carries the key bytes in
//! the clear, tagged with the master key id and context so unwrap can
//! enforce the same context-match rule the real service does. Used by unit
//! tests, the integration suites, and (behind `test-kms` +
//! `CACHETTE_MOCK_KMS`) the binary itself.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{DataKey, EncryptionContext, KmsClient};
use crate::core::aead::KEY_SIZE;
use crate::core::rand::{OsRandom, SecureRandom};
use crate::error::KmsError;

/// What the mock stores inside a wrapped key blob.
#[derive(Serialize, Deserialize)]
struct WrappedKey {
    key_id: String,
    context: EncryptionContext,
    key: String,
}

/// Programmable test double for [`KmsClient`].
#[derive(Debug, Default)]
pub struct MockKms {
    fixed_key: Option<[u8; KEY_SIZE]>,
    fail_generate: Option<String>,
    fail_decrypt: Option<String>,
}

impl MockKms {
    /// A mock that hands out a fresh random key per generate call and
    /// enforces context equality on unwrap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always return `key` as the data key plaintext.
    pub fn with_fixed_key(key: [u8; KEY_SIZE]) -> Self {
        Self {
            fixed_key: Some(key),
            ..Self::default()
        }
    }

    /// Fail every generate call with `message`.
    pub fn failing_generate(message: &str) -> Self {
        Self {
            fail_generate: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Fail every decrypt call with `message`.
    pub fn failing_decrypt(message: &str) -> Self {
        Self {
            fail_decrypt: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl KmsClient for MockKms {
    fn generate_data_key(
        &self,
        key_id: &str,
        context: &EncryptionContext,
    ) -> Result<DataKey, KmsError> {
        if let Some(msg) = &self.fail_generate {
            return Err(KmsError::Service(msg.clone().into()));
        }

        let mut key = [0u8; KEY_SIZE];
        match self.fixed_key {
            Some(fixed) => key = fixed,
            None => OsRandom
                .fill(&mut key)
                .map_err(|e| KmsError::Service(e.to_string().into()))?,
        }

        let wrapped = WrappedKey {
            key_id: key_id.to_string(),
            context: context.clone(),
            key: BASE64.encode(key),
        };
        let ciphertext = serde_json::to_vec(&wrapped)
            .map_err(|e| KmsError::Service(Box::new(e)))?;

        Ok(DataKey {
            ciphertext,
            plaintext: Zeroizing::new(key.to_vec()),
        })
    }

    fn decrypt_data_key(
        &self,
        key_ciphertext: &[u8],
        context: &EncryptionContext,
    ) -> Result<DataKey, KmsError> {
        if let Some(msg) = &self.fail_decrypt {
            return Err(KmsError::Service(msg.clone().into()));
        }

        let wrapped: WrappedKey = serde_json::from_slice(key_ciphertext)
            .map_err(|_| KmsError::Service("not a mock-wrapped data key".into()))?;

        // The real service authenticates the context; mismatches refuse to
        // unwrap rather than returning a wrong key.
        if &wrapped.context != context {
            return Err(KmsError::Service("encryption context mismatch".into()));
        }

        let key = BASE64
            .decode(&wrapped.key)
            .map_err(|e| KmsError::Service(Box::new(e)))?;

        Ok(DataKey {
            ciphertext: key_ciphertext.to_vec(),
            plaintext: Zeroizing::new(key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> EncryptionContext {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    #[test]
    fn test_generate_then_decrypt_roundtrip() {
        let kms = MockKms::new();
        let context = ctx(&[("Secret", "db_password")]);

        let generated = kms.generate_data_key("key-1", &context).unwrap();
        let unwrapped = kms.decrypt_data_key(&generated.ciphertext, &context).unwrap();

        assert_eq!(*generated.plaintext, *unwrapped.plaintext);
        assert_eq!(generated.plaintext.len(), KEY_SIZE);
    }

    #[test]
    fn test_context_mismatch_refused() {
        let kms = MockKms::new();
        let generated = kms
            .generate_data_key("key-1", &ctx(&[("Secret", "a")]))
            .unwrap();

        let err = kms
            .decrypt_data_key(&generated.ciphertext, &ctx(&[("Secret", "b")]))
            .unwrap_err();
        assert!(err.to_string().contains("context mismatch"));
    }

    #[test]
    fn test_fresh_key_per_generate() {
        let kms = MockKms::new();
        let context = EncryptionContext::new();

        let a = kms.generate_data_key("key-1", &context).unwrap();
        let b = kms.generate_data_key("key-1", &context).unwrap();
        assert_ne!(*a.plaintext, *b.plaintext);
    }

    #[test]
    fn test_fixed_key() {
        let kms = MockKms::with_fixed_key([3u8; KEY_SIZE]);
        let generated = kms
            .generate_data_key("key-1", &EncryptionContext::new())
            .unwrap();
        assert_eq!(*generated.plaintext, vec![3u8; KEY_SIZE]);
    }

    #[test]
    fn test_programmed_failures() {
        let context = EncryptionContext::new();

        let kms = MockKms::failing_generate("generate down");
        assert!(kms.generate_data_key("key-1", &context).is_err());

        let kms = MockKms::failing_decrypt("decrypt down");
        assert!(kms.decrypt_data_key(b"{}", &context).is_err());
    }

    #[test]
    fn test_garbage_wrapped_key_rejected() {
        let kms = MockKms::new();
        assert!(kms
            .decrypt_data_key(b"not json", &EncryptionContext::new())
            .is_err());
    }
}
