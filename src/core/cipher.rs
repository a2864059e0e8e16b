//! Envelope cipher: one secret value under a master key and a context.
//!
//! Every encryption requests a fresh data key from the key-management
//! capability, seals the plaintext locally, and stores the wrapped key next
//! to the payload. Compromise of one data key therefore exposes exactly one
//! secret version. The context binds the secret's name into the service's
//! authorization path, so ciphertexts cannot be swapped between secrets
//! undetected.

use tracing::trace;

use crate::core::aead;
use crate::core::codec;
use crate::core::kms::{EncryptionContext, KmsClient};
use crate::core::rand::{SecureRandom, OS_RANDOM};
use crate::error::{CipherError, Result};

/// Cipher bound to a key-management capability and a master key id.
///
/// The per-secret context is supplied per call, so one instance serves every
/// secret sharing a master key.
pub struct EnvelopeCipher<'a> {
    kms: &'a dyn KmsClient,
    key_id: &'a str,
    rng: &'a dyn SecureRandom,
}

impl<'a> EnvelopeCipher<'a> {
    pub fn new(kms: &'a dyn KmsClient, key_id: &'a str) -> Self {
        Self {
            kms,
            key_id,
            rng: &OS_RANDOM,
        }
    }

    /// Replace the randomness source. Tests use this to inject
    /// deterministic or failing nonces.
    pub fn with_rng(kms: &'a dyn KmsClient, key_id: &'a str, rng: &'a dyn SecureRandom) -> Self {
        Self { kms, key_id, rng }
    }

    /// Encrypt `plaintext` under a freshly generated data key.
    pub fn encrypt(&self, plaintext: &str, context: &EncryptionContext) -> Result<String> {
        trace!(key_id = %self.key_id, plaintext_len = plaintext.len(), "encrypting");

        let data_key = self
            .kms
            .generate_data_key(self.key_id, context)
            .map_err(CipherError::KeyGenerationFailed)?;

        let sealed = aead::seal(self.rng, &data_key.plaintext, plaintext.as_bytes())?;

        // The raw key must not outlive this call.
        let key_ciphertext = data_key.ciphertext;
        drop(data_key.plaintext);

        Ok(codec::encode(&key_ciphertext, &sealed))
    }

    /// Decrypt a wire-encoded ciphertext.
    ///
    /// `context` must be identical to the one supplied at encryption time;
    /// the key-management service refuses to unwrap the data key otherwise.
    pub fn decrypt(&self, encoded: &str, context: &EncryptionContext) -> Result<String> {
        let message = codec::decode(encoded)?;

        let data_key = self
            .kms
            .decrypt_data_key(&message.key_ciphertext, context)
            .map_err(CipherError::KeyUnwrapFailed)?;

        let plaintext = aead::open(&data_key.plaintext, &message.ciphertext)?;
        drop(data_key);

        trace!(key_id = %self.key_id, "decrypted");
        String::from_utf8(plaintext).map_err(|e| CipherError::InvalidUtf8(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aead::KEY_SIZE;
    use crate::core::kms::mock::MockKms;
    use crate::core::rand::FailingRandom;
    use crate::error::{CryptoError, Error};

    fn ctx(name: &str) -> EncryptionContext {
        [("Secret".to_string(), Some(name.to_string()))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let kms = MockKms::new();
        let cipher = EnvelopeCipher::new(&kms, "key-1");

        let encoded = cipher.encrypt("s3cr3t", &ctx("db_password")).unwrap();
        assert!(encoded.starts_with(codec::MAGIC));
        assert_eq!(cipher.decrypt(&encoded, &ctx("db_password")).unwrap(), "s3cr3t");
    }

    #[test]
    fn test_roundtrip_with_fixed_data_key() {
        let kms = MockKms::with_fixed_key([42u8; KEY_SIZE]);
        let cipher = EnvelopeCipher::new(&kms, "key-1");
        let context = ctx("api_token");

        let encoded = cipher.encrypt("héllo wörld", &context).unwrap();
        assert_eq!(cipher.decrypt(&encoded, &context).unwrap(), "héllo wörld");
    }

    #[test]
    fn test_context_binding() {
        let kms = MockKms::new();
        let cipher = EnvelopeCipher::new(&kms, "key-1");

        let encoded = cipher.encrypt("v", &ctx("original")).unwrap();
        let err = cipher.decrypt(&encoded, &ctx("tampered")).unwrap_err();
        assert!(matches!(
            err,
            Error::Cipher(CipherError::KeyUnwrapFailed(_))
        ));
    }

    #[test]
    fn test_fresh_data_key_per_encryption() {
        let kms = MockKms::new();
        let cipher = EnvelopeCipher::new(&kms, "key-1");
        let context = ctx("same");

        let a = cipher.encrypt("same value", &context).unwrap();
        let b = cipher.encrypt("same value", &context).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_failure_propagates() {
        let kms = MockKms::failing_generate("kms is down");
        let cipher = EnvelopeCipher::new(&kms, "key-1");

        let err = cipher.encrypt("v", &ctx("x")).unwrap_err();
        assert!(matches!(
            err,
            Error::Cipher(CipherError::KeyGenerationFailed(_))
        ));
    }

    #[test]
    fn test_unwrap_failure_propagates() {
        let kms = MockKms::new();
        let cipher = EnvelopeCipher::new(&kms, "key-1");
        let encoded = cipher.encrypt("v", &ctx("x")).unwrap();

        let failing = MockKms::failing_decrypt("denied");
        let cipher = EnvelopeCipher::new(&failing, "key-1");
        let err = cipher.decrypt(&encoded, &ctx("x")).unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::KeyUnwrapFailed(_))));
    }

    #[test]
    fn test_randomness_failure_propagates() {
        let kms = MockKms::new();
        let cipher = EnvelopeCipher::with_rng(&kms, "key-1", &FailingRandom);

        let err = cipher.encrypt("v", &ctx("x")).unwrap_err();
        assert!(matches!(
            err,
            Error::Crypto(CryptoError::RandomnessUnavailable(_))
        ));
    }

    #[test]
    fn test_decrypt_rejects_malformed_encoding() {
        let kms = MockKms::new();
        let cipher = EnvelopeCipher::new(&kms, "key-1");
        assert!(cipher.decrypt("garbage", &ctx("x")).is_err());
    }

    #[test]
    fn test_tampered_payload_fails_authentication() {
        let kms = MockKms::with_fixed_key([9u8; KEY_SIZE]);
        let cipher = EnvelopeCipher::new(&kms, "key-1");
        let context = ctx("x");

        let encoded = cipher.encrypt("payload", &context).unwrap();

        // Re-encode with one payload byte flipped; the wrapped key is intact
        // so the failure comes from the AEAD tag, not the KMS.
        let decoded = codec::decode(&encoded).unwrap();
        let mut payload = decoded.ciphertext;
        let last = payload.len() - 1;
        payload[last] ^= 0x01;
        let tampered = codec::encode(&decoded.key_ciphertext, &payload);

        let err = cipher.decrypt(&tampered, &context).unwrap_err();
        assert!(matches!(
            err,
            Error::Crypto(CryptoError::AuthenticationFailed)
        ));
    }
}
