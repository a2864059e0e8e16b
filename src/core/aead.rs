//! Authenticated encryption for secret payloads.
//!
//! XChaCha20-Poly1305 with a 32-byte key. Key size: 32 bytes. Nonce: 24
//! bytes (random per call). Tag: 16 bytes.
//!
//! Sealed wire format:
//!
//! ```text
//! [ nonce (24 bytes) | ciphertext + tag ]
//! ```
//!
//! The nonce is freshly random for every seal and travels with the output,
//! so no nonce state is ever persisted.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::core::rand::SecureRandom;
use crate::error::{CryptoError, Result};

/// Key size required by the cipher, matching AES_256 data keys from KMS.
pub const KEY_SIZE: usize = 32;

/// Nonce size for XChaCha20-Poly1305.
pub const NONCE_SIZE: usize = 24;

fn cipher(key: &[u8]) -> Result<XChaCha20Poly1305> {
    if key.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        }
        .into());
    }

    XChaCha20Poly1305::new_from_slice(key).map_err(|_| {
        CryptoError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        }
        .into()
    })
}

/// Encrypt and authenticate `plaintext` under a 32-byte key.
///
/// A fresh nonce is drawn from `rng` for every call and prepended to the
/// sealed payload.
pub fn seal(rng: &dyn SecureRandom, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher(key)?;

    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill(&mut nonce)?;

    let sealed = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::SealFailed)?;

    let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Authenticate and decrypt a blob produced by [`seal`].
///
/// Fails with a uniform [`CryptoError::AuthenticationFailed`] whether the
/// blob was tampered with, the key is wrong, or the input is corrupted.
pub fn open(key: &[u8], blob: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher(key)?;

    if blob.len() < NONCE_SIZE {
        return Err(CryptoError::InvalidCiphertext.into());
    }

    let (nonce, sealed) = blob.split_at(NONCE_SIZE);

    cipher
        .decrypt(XNonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::AuthenticationFailed.into())
}
