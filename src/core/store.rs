//! The secrets file: an ordered collection of named, envelope-encrypted
//! records.
//!
//! The store owns (de)serialization and the mutation operations; it never
//! saves itself. Callers persist explicitly after a successful mutation, so
//! a failed operation leaves the on-disk file exactly as it was.

use std::fs;
use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cipher::EnvelopeCipher;
use crate::core::kms::{EncryptionContext, KmsClient};
use crate::error::{Result, StoreError};

/// Schema version written to new files. Only version 1 exists.
pub const SCHEMA_VERSION: u32 = 1;

/// Context key carrying the secret's name, added to the shared context for
/// every per-secret operation.
const CONTEXT_NAME_KEY: &str = "Secret";

/// One named secret.
///
/// `name` is unique within a store and, by convention, a lowercase
/// identifier so exported variables are usable from a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,

    /// Free-form explanation of what the secret is for: how to rotate it,
    /// where it is used, ...
    pub description: String,

    /// Set when the secret is added. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,

    /// Set when the secret's value is rotated. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotated_at: Option<DateTime<Utc>>,

    /// Wire-encoded ciphertext: magic, wrapped data key, sealed payload.
    pub ciphertext: String,
}

/// A secrets file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Identifier of the master key every secret in this file is encrypted
    /// under: a key ARN, an alias ARN, a bare key id, or an `alias/` name.
    pub kms_key_id: String,

    /// Schema version of this file.
    pub version: u32,

    /// Context pairs authenticated with every data key in this file.
    /// Changing them requires re-encrypting every secret.
    pub encryption_context: EncryptionContext,

    /// Secrets in insertion order. Order is preserved across save/load so
    /// exports are deterministic.
    pub secrets: Vec<Secret>,
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

impl Store {
    /// A new, empty store.
    pub fn new(kms_key_id: impl Into<String>, encryption_context: EncryptionContext) -> Self {
        Self {
            kms_key_id: kms_key_id.into(),
            version: SCHEMA_VERSION,
            encryption_context,
            secrets: Vec::new(),
        }
    }

    /// Deserialize a store from persisted bytes.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let store: Store = serde_json::from_slice(bytes).map_err(StoreError::Decode)?;
        Ok(store)
    }

    /// Read and deserialize the file at `path`.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::load(&bytes)
    }

    /// Serialize deterministically: pretty-printed, stable key order, one
    /// trailing newline.
    pub fn save(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self).map_err(StoreError::Encode)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Serialize and write to `path`, readable by the owning user only.
    pub fn save_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.save()?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %path.display(), secrets = self.secrets.len(), "saved store");
        Ok(())
    }

    /// The secret named `name`, if present.
    pub fn find(&self, name: &str) -> Option<&Secret> {
        self.secrets.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// The shared context plus this secret's name.
    fn context_for(&self, name: &str) -> EncryptionContext {
        let mut context = self.encryption_context.clone();
        context.insert(CONTEXT_NAME_KEY.to_string(), Some(name.to_string()));
        context
    }

    fn tag(name: &str) -> impl FnOnce(crate::error::Error) -> crate::error::Error + '_ {
        move |e| {
            StoreError::Secret {
                name: name.to_string(),
                source: Box::new(e),
            }
            .into()
        }
    }

    /// Encrypt `plaintext` and append it as a new secret.
    ///
    /// Refuses a name that is already present; changing an existing value
    /// is [`Store::rotate`]'s job. The store is untouched on any failure.
    pub fn add(
        &mut self,
        kms: &dyn KmsClient,
        plaintext: &str,
        name: &str,
        description: &str,
    ) -> Result<()> {
        if self.contains(name) {
            return Err(StoreError::DuplicateName(name.to_string()).into());
        }

        let context = self.context_for(name);
        let cipher = EnvelopeCipher::new(kms, &self.kms_key_id);
        let ciphertext = cipher.encrypt(plaintext, &context).map_err(Self::tag(name))?;

        debug!(name = %name, "added secret");
        self.secrets.push(Secret {
            name: name.to_string(),
            description: description.to_string(),
            added_at: Some(now()),
            rotated_at: None,
            ciphertext,
        });
        Ok(())
    }

    /// Replace the value of an existing secret under a fresh data key.
    ///
    /// Rotating to the value already stored fails with
    /// [`StoreError::NoOpRotation`]: accepting it would mask operator
    /// mistakes and produce a rotation timestamp with no new ciphertext
    /// behind it. The record is only mutated once the new ciphertext exists.
    pub fn rotate(&mut self, kms: &dyn KmsClient, name: &str, new_plaintext: &str) -> Result<()> {
        let index = self
            .secrets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        let context = self.context_for(name);
        let cipher = EnvelopeCipher::new(kms, &self.kms_key_id);

        let old_plaintext = cipher
            .decrypt(&self.secrets[index].ciphertext, &context)
            .map_err(Self::tag(name))?;

        if old_plaintext == new_plaintext {
            return Err(StoreError::NoOpRotation(name.to_string()).into());
        }

        let ciphertext = cipher.encrypt(new_plaintext, &context).map_err(Self::tag(name))?;

        debug!(name = %name, "rotated secret");
        let secret = &mut self.secrets[index];
        secret.ciphertext = ciphertext;
        secret.rotated_at = Some(now());
        Ok(())
    }

    /// Re-encrypt every secret under `new_kms_key_id`.
    ///
    /// Re-encrypted records accumulate in a separate collection; the
    /// secrets list and the key id are swapped in together only once every
    /// record has succeeded. A failure partway through therefore leaves the
    /// store exactly as it was, tagged with the name of the secret that
    /// failed.
    pub fn rotate_master_key(&mut self, kms: &dyn KmsClient, new_kms_key_id: &str) -> Result<()> {
        let old_cipher = EnvelopeCipher::new(kms, &self.kms_key_id);
        let new_cipher = EnvelopeCipher::new(kms, new_kms_key_id);

        let mut rotated = Vec::with_capacity(self.secrets.len());
        for secret in &self.secrets {
            let context = self.context_for(&secret.name);

            let plaintext = old_cipher
                .decrypt(&secret.ciphertext, &context)
                .map_err(Self::tag(&secret.name))?;

            let ciphertext = new_cipher
                .encrypt(&plaintext, &context)
                .map_err(Self::tag(&secret.name))?;

            rotated.push(Secret {
                ciphertext,
                ..secret.clone()
            });
        }

        debug!(
            old = %self.kms_key_id,
            new = %new_kms_key_id,
            secrets = rotated.len(),
            "rotated master key"
        );
        self.secrets = rotated;
        self.kms_key_id = new_kms_key_id.to_string();
        Ok(())
    }

    /// Decrypt secrets lazily, in store order.
    ///
    /// The iterator yields `(name, plaintext)` pairs and fuses after the
    /// first failure: a consumer observing a short sequence must check the
    /// last item for an error.
    pub fn export_plaintext<'a>(&'a self, kms: &'a dyn KmsClient) -> PlaintextExport<'a> {
        PlaintextExport {
            store: self,
            cipher: EnvelopeCipher::new(kms, &self.kms_key_id),
            next: 0,
            failed: false,
        }
    }
}

/// Iterator over decrypted `(name, plaintext)` pairs. See
/// [`Store::export_plaintext`].
pub struct PlaintextExport<'a> {
    store: &'a Store,
    cipher: EnvelopeCipher<'a>,
    next: usize,
    failed: bool,
}

impl Iterator for PlaintextExport<'_> {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let secret = self.store.secrets.get(self.next)?;
        self.next += 1;

        let context = self.store.context_for(&secret.name);
        match self.cipher.decrypt(&secret.ciphertext, &context) {
            Ok(plaintext) => Some(Ok((secret.name.clone(), plaintext))),
            Err(e) => {
                self.failed = true;
                Some(Err(Store::tag(&secret.name)(e)))
            }
        }
    }
}
