//! Error types for cachette.
//!
//! Each layer of the crate has its own error enum; the top-level [`Error`]
//! wraps them so call sites can use one `Result` alias while matches on a
//! specific layer stay possible (the binary uses this to print hints).

use thiserror::Error;

/// Errors from the authenticated encryption primitive.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    #[error("secure random source unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("ciphertext too short to contain a nonce")]
    InvalidCiphertext,

    /// Covers tampering, a wrong key, and corrupted input uniformly.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("unable to seal plaintext")]
    SealFailed,
}

/// Errors from the ciphertext wire codec.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("malformed encoding: {0:?}")]
    MalformedEncoding(String),

    #[error("invalid base64 in {field}: {source}")]
    Base64Decode {
        field: &'static str,
        source: base64::DecodeError,
    },
}

/// Errors from the key-management capability.
#[derive(Error, Debug)]
pub enum KmsError {
    #[error("key management service error: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("no KMS backend compiled in (rebuild with --features aws)")]
    NoBackend,
}

/// Errors from the envelope cipher.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("unable to generate data key: {0}")]
    KeyGenerationFailed(#[source] KmsError),

    #[error("unable to decrypt data key ciphertext: {0}")]
    KeyUnwrapFailed(#[source] KmsError),

    #[error("decrypted payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Errors from the secret store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("secret already exists: {0}")]
    DuplicateName(String),

    #[error("rotating {0} with the same value")]
    NoOpRotation(String),

    #[error("unable to decode secrets file: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unable to encode secrets file: {0}")]
    Encode(#[source] serde_json::Error),

    /// A failure on one secret during a whole-store operation.
    #[error("secret {name}: {source}")]
    Secret {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

/// Errors from user input validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid secret name {0:?}: must be lowercase letters, digits or underscores, and cannot start with a digit")]
    InvalidName(String),

    #[error("invalid context entry {0:?}: expected KEY=VALUE")]
    InvalidContext(String),

    #[error("no secrets file found at {0}")]
    MissingFile(String),

    #[error("secrets file is a directory: {0}")]
    IsDirectory(String),

    #[error("a file already exists at {0}")]
    FileExists(String),
}

/// Errors from the export formatters.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("unable to render JSON output: {0}")]
    Json(#[source] serde_json::Error),

    #[error("unable to render YAML output: {0}")]
    Yaml(#[source] serde_yaml::Error),
}

/// Top-level error wrapping every layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Kms(#[from] KmsError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
