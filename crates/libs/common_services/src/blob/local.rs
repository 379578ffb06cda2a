use crate::blob::{BlobError, BlobKey, BlobStore, DeleteOutcome};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::OnceCell;
use tracing::info;

/// Stores blobs as files under `root`. The api serves them under `{public_base_url}/{key}`.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
    root_ready: OnceCell<()>,
}

impl LocalBlobStore {
    #[must_use]
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
            root_ready: OnceCell::new(),
        }
    }

    #[must_use]
    pub const fn root(&self) -> &PathBuf {
        &self.root
    }

    async fn ensure_root(&self) -> Result<(), BlobError> {
        self.root_ready
            .get_or_try_init(|| async {
                fs::create_dir_all(&self.root).await?;
                info!("Local blob root ready at {}", self.root.display());
                Ok::<(), BlobError>(())
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(
        &self,
        key: &BlobKey,
        bytes: Bytes,
        _mime_type: &str,
    ) -> Result<String, BlobError> {
        self.ensure_root().await?;
        fs::write(self.root.join(key.as_str()), &bytes).await?;
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete(&self, key: &BlobKey) -> Result<DeleteOutcome, BlobError> {
        match fs::remove_file(self.root.join(key.as_str())).await {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(DeleteOutcome::NotFound),
            Err(err) => Err(err.into()),
        }
    }
}
