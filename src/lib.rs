//! Cachette - a file of named secrets, each envelope-encrypted against a
//! cloud key-management service.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create a new secrets file
//! │   ├── add           # Encrypt and append a secret
//! │   ├── rotate        # Replace one secret's value
//! │   ├── rotate_master_key  # Re-encrypt everything under a new key
//! │   ├── export        # Decrypt to bash/dotenv/json/yaml
//! │   └── import        # Bulk-add from a dotenv file
//! └── core/             # Core library components
//!     ├── rand          # Injectable CSPRNG
//!     ├── aead          # XChaCha20-Poly1305 seal/open
//!     ├── codec         # Ciphertext wire format
//!     ├── kms/          # Key-management capability
//!     │   ├── mod       # KmsClient trait + DataKey
//!     │   ├── aws       # AWS KMS backend (feature-gated)
//!     │   └── mock      # In-process test double
//!     ├── cipher        # Envelope cipher
//!     ├── store         # The secrets file aggregate
//!     ├── validation    # Name/context/path validation
//!     └── format        # Export formatters
//! ```
//!
//! # Design
//!
//! Every secret is sealed with its own 256-bit data key; only the wrapped
//! form of that key is stored, next to the payload it protects. The
//! key-management service authenticates an encryption context carrying the
//! secret's name, so ciphertexts cannot be moved between secrets without
//! detection. The store file is deterministic JSON, safe to diff and
//! commit.

pub mod cli;
pub mod core;
pub mod error;
