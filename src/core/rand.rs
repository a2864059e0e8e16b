//! CSPRNG behind an injectable provider.
//!
//! Nonce generation must never depend on process-global mutable state, so
//! the cipher takes a [`SecureRandom`] instead of calling the OS directly.
//! Production code uses [`OsRandom`]; tests substitute deterministic or
//! failing sources.

use crate::error::{CryptoError, Result};

/// Source of cryptographically secure random bytes.
pub trait SecureRandom {
    /// Fill `buf` with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// OS-backed randomness.
///
/// Implemented with the `getrandom` crate, which uses getrandom(2) on Linux,
/// getentropy(2) on the BSDs, and the platform equivalents elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        getrandom::getrandom(buf)
            .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
        Ok(())
    }
}

/// Shared instance used as the default provider.
pub static OS_RANDOM: OsRandom = OsRandom;

/// Repeats a fixed byte pattern. Test double, never used in production.
#[derive(Debug, Clone)]
pub struct FixedRandom(pub Vec<u8>);

impl SecureRandom for FixedRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.0[i % self.0.len()];
        }
        Ok(())
    }
}

/// Always fails. Test double for the randomness-unavailable path.
#[derive(Debug, Clone, Copy)]
pub struct FailingRandom;

impl SecureRandom for FailingRandom {
    fn fill(&self, _buf: &mut [u8]) -> Result<()> {
        Err(CryptoError::RandomnessUnavailable("injected failure".to_string()).into())
    }
}
