//! Wire codec properties over the public API.

use cachette::core::codec::{decode, encode, MAGIC};
use cachette::error::{CodecError, Error};
use proptest::prelude::*;

#[test]
fn test_magic_is_stable() {
    // Stored files depend on this literal; changing it is a format break.
    assert_eq!(MAGIC, "CCT1]");
}

#[test]
fn test_known_encoding() {
    let encoded = encode(b"wrapped", b"sealed");
    assert_eq!(encoded, "CCT1];d3JhcHBlZA==;c2VhbGVk");

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded.key_ciphertext, b"wrapped");
    assert_eq!(decoded.ciphertext, b"sealed");
}

#[test]
fn test_malformed_inputs_rejected_before_base64() {
    let cases = [
        "",
        "CCT1]",
        "CCT1];only-one-part",
        "WRONGMAGIC;YQ==;YQ==",
        "CCT1];YQ==;YQ==;extra",
        "cct1];YQ==;YQ==",
    ];

    for input in cases {
        assert!(
            matches!(
                decode(input).unwrap_err(),
                Error::Codec(CodecError::MalformedEncoding(_))
            ),
            "expected malformed-encoding error for {:?}",
            input
        );
    }
}

proptest! {
    #[test]
    fn prop_roundtrip(
        key in proptest::collection::vec(any::<u8>(), 0..256),
        payload in proptest::collection::vec(any::<u8>(), 0..1024),
    ) {
        let decoded = decode(&encode(&key, &payload)).unwrap();
        prop_assert_eq!(decoded.key_ciphertext, key);
        prop_assert_eq!(decoded.ciphertext, payload);
    }

    /// The encoded form never contains more than two delimiters, whatever
    /// bytes go in.
    #[test]
    fn prop_delimiter_count(
        key in proptest::collection::vec(any::<u8>(), 0..64),
        payload in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let encoded = encode(&key, &payload);
        prop_assert_eq!(encoded.matches(';').count(), 2);
    }
}
