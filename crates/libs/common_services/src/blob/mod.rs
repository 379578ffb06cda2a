mod azure;
mod error;
mod keys;
mod local;

pub use azure::AzureBlobStore;
pub use error::BlobError;
pub use keys::BlobKey;
pub use local::LocalBlobStore;

use app_state::{AppSettings, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Blob gateway. Stores bytes under a key and hands back a public url.
///
/// No size or type policy is enforced here; callers validate before storing.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, key: &BlobKey, bytes: Bytes, mime_type: &str)
    -> Result<String, BlobError>;

    async fn delete(&self, key: &BlobKey) -> Result<DeleteOutcome, BlobError>;
}

/// Build the blob store selected by `storage.backend`.
pub fn blob_store_from_settings(settings: &AppSettings) -> Result<Arc<dyn BlobStore>, BlobError> {
    Ok(match settings.storage.backend {
        StorageBackend::Azure => Arc::new(AzureBlobStore::new(
            &settings.storage,
            &settings.secrets.storage_sas_token,
        )?),
        StorageBackend::Local => Arc::new(LocalBlobStore::new(
            settings.storage.local_root.clone(),
            format!("{}/blobs", settings.api.public_url),
        )),
    })
}
