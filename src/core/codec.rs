//! Wire format for stored ciphertexts.
//!
//! A secret's ciphertext is stored in the JSON file as a single delimited
//! string:
//!
//! ```text
//! CCT1];base64(key_ciphertext);base64(payload_ciphertext)
//! ```
//!
//! The leading magic tags the scheme so the format can be versioned later.
//! Standard base64 never emits `;`, so a plain split on the delimiter is
//! unambiguous.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{CodecError, Result};

/// Magic tag identifying version 1 of the wire format.
pub const MAGIC: &str = "CCT1]";

/// A decoded wire message: the wrapped data key and the sealed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub key_ciphertext: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// Encode a wrapped data key and a sealed payload into the wire string.
pub fn encode(key_ciphertext: &[u8], ciphertext: &[u8]) -> String {
    format!(
        "{};{};{}",
        MAGIC,
        BASE64.encode(key_ciphertext),
        BASE64.encode(ciphertext)
    )
}

/// Decode a wire string, validating the format before touching base64.
pub fn decode(encoded: &str) -> Result<Encoded> {
    let parts: Vec<&str> = encoded.split(';').collect();
    if parts.len() != 3 || parts[0] != MAGIC {
        return Err(CodecError::MalformedEncoding(encoded.to_string()).into());
    }

    let key_ciphertext = BASE64.decode(parts[1]).map_err(|source| CodecError::Base64Decode {
        field: "key ciphertext",
        source,
    })?;

    let ciphertext = BASE64.decode(parts[2]).map_err(|source| CodecError::Base64Decode {
        field: "payload ciphertext",
        source,
    })?;

    Ok(Encoded {
        key_ciphertext,
        ciphertext,
    })
}
