//! AWS KMS backend.
//!
//! Enable with `--features aws`. Credentials come from the environment
//! (AWS_ACCESS_KEY_ID, etc.) or the default provider chain. The master key
//! id may be a key ARN, an alias ARN, a bare key id, or an `alias/` name.

use std::collections::HashMap;

use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::types::DataKeySpec;
use tracing::trace;
use zeroize::Zeroizing;

use super::{DataKey, EncryptionContext, KmsClient};
use crate::error::KmsError;

/// Client for AWS Key Management Service.
///
/// Stateless: the SDK config is loaded per call, so a long-lived instance
/// never holds stale credentials.
#[derive(Debug, Default)]
pub struct AwsKms;

impl AwsKms {
    pub fn new() -> Self {
        Self
    }
}

/// KMS wants plain string pairs; a present-but-unset value is sent empty so
/// both sides of a wrap/unwrap derive the identical map from the store file.
fn sdk_context(context: &EncryptionContext) -> HashMap<String, String> {
    context
        .iter()
        .map(|(k, v)| (k.clone(), v.clone().unwrap_or_default()))
        .collect()
}

fn service_error(err: impl std::error::Error + Send + Sync + 'static) -> KmsError {
    KmsError::Service(Box::new(err))
}

impl KmsClient for AwsKms {
    fn generate_data_key(
        &self,
        key_id: &str,
        context: &EncryptionContext,
    ) -> Result<DataKey, KmsError> {
        trace!(key_id = %key_id, "requesting data key from AWS KMS");

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(service_error)?;

        rt.block_on(async {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_kms::Client::new(&config);

            let resp = client
                .generate_data_key()
                .key_id(key_id)
                .key_spec(DataKeySpec::Aes256)
                .set_encryption_context(Some(sdk_context(context)))
                .send()
                .await
                .map_err(service_error)?;

            let ciphertext = resp
                .ciphertext_blob()
                .ok_or_else(|| KmsError::Service("no ciphertext blob returned".into()))?
                .as_ref()
                .to_vec();

            let plaintext = resp
                .plaintext()
                .ok_or_else(|| KmsError::Service("no plaintext key returned".into()))?
                .as_ref()
                .to_vec();

            trace!(wrapped_len = ciphertext.len(), "received data key");

            Ok(DataKey {
                ciphertext,
                plaintext: Zeroizing::new(plaintext),
            })
        })
    }

    fn decrypt_data_key(
        &self,
        key_ciphertext: &[u8],
        context: &EncryptionContext,
    ) -> Result<DataKey, KmsError> {
        trace!(wrapped_len = key_ciphertext.len(), "unwrapping data key via AWS KMS");

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(service_error)?;

        rt.block_on(async {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_kms::Client::new(&config);

            // The wrapped blob already names its master key, so no key id is
            // passed here.
            let resp = client
                .decrypt()
                .ciphertext_blob(Blob::new(key_ciphertext))
                .set_encryption_context(Some(sdk_context(context)))
                .send()
                .await
                .map_err(service_error)?;

            let plaintext = resp
                .plaintext()
                .ok_or_else(|| KmsError::Service("no plaintext key returned".into()))?
                .as_ref()
                .to_vec();

            Ok(DataKey {
                ciphertext: key_ciphertext.to_vec(),
                plaintext: Zeroizing::new(plaintext),
            })
        })
    }
}
