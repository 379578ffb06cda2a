use crate::blob::{BlobError, BlobKey, BlobStore, DeleteOutcome};
use app_state::StorageSettings;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, header};
use tokio::sync::OnceCell;
use tracing::{debug, info};

const API_VERSION: &str = "2021-08-06";

/// Azure Blob Storage over its REST api, authorized with a container SAS token.
pub struct AzureBlobStore {
    client: Client,
    container_url: String,
    sas_token: String,
    container_ready: OnceCell<()>,
}

impl AzureBlobStore {
    pub fn new(settings: &StorageSettings, sas_token: &str) -> Result<Self, BlobError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            client,
            container_url: format!("{}/{}", settings.blob_endpoint(), settings.container),
            sas_token: sas_token.trim_start_matches('?').to_owned(),
            container_ready: OnceCell::new(),
        })
    }

    fn public_url(&self, key: &BlobKey) -> String {
        format!("{}/{}", self.container_url, key)
    }

    fn signed(&self, url: &str, query: &str) -> String {
        let mut params: Vec<&str> = Vec::new();
        if !query.is_empty() {
            params.push(query);
        }
        if !self.sas_token.is_empty() {
            params.push(&self.sas_token);
        }
        if params.is_empty() {
            url.to_owned()
        } else {
            format!("{url}?{}", params.join("&"))
        }
    }

    /// Create the container with public blob read access, once per process.
    async fn ensure_container(&self) -> Result<(), BlobError> {
        self.container_ready
            .get_or_try_init(|| async {
                let response = self
                    .client
                    .put(self.signed(&self.container_url, "restype=container"))
                    .header("x-ms-version", API_VERSION)
                    .header("x-ms-blob-public-access", "blob")
                    .header(header::CONTENT_LENGTH, 0)
                    .send()
                    .await?;
                let status = response.status();
                // 409: already exists.
                if status.is_success() || status == StatusCode::CONFLICT {
                    info!("Blob container ready at {}", self.container_url);
                    Ok::<(), BlobError>(())
                } else {
                    Err(BlobError::Status {
                        status: status.as_u16(),
                        body: response.text().await.unwrap_or_default(),
                    })
                }
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn store(
        &self,
        key: &BlobKey,
        bytes: Bytes,
        mime_type: &str,
    ) -> Result<String, BlobError> {
        self.ensure_container().await?;
        let url = self.public_url(key);
        debug!("Uploading {} bytes to {}", bytes.len(), url);
        let response = self
            .client
            .put(self.signed(&url, ""))
            .header("x-ms-version", API_VERSION)
            .header("x-ms-blob-type", "BlockBlob")
            .header(header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BlobError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(url)
    }

    async fn delete(&self, key: &BlobKey) -> Result<DeleteOutcome, BlobError> {
        let response = self
            .client
            .delete(self.signed(&self.public_url(key), ""))
            .header("x-ms-version", API_VERSION)
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::NotFound),
            status if status.is_success() => Ok(DeleteOutcome::Deleted),
            status => Err(BlobError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_state::StorageBackend;
    use color_eyre::Result;

    fn settings(endpoint: Option<&str>) -> StorageSettings {
        StorageSettings {
            backend: StorageBackend::Azure,
            container: "photos".to_owned(),
            account_name: "acct".to_owned(),
            endpoint: endpoint.map(str::to_owned),
            local_root: std::env::temp_dir(),
            connect_timeout: 5,
            request_timeout: 5,
        }
    }

    #[test]
    fn builds_public_and_signed_urls() -> Result<()> {
        let store = AzureBlobStore::new(&settings(None), "?sv=1&sig=abc")?;
        let key = BlobKey::parse("1-000001.jpg")?;
        let url = store.public_url(&key);
        assert_eq!(url, "https://acct.blob.core.windows.net/photos/1-000001.jpg");
        assert_eq!(store.signed(&url, ""), format!("{url}?sv=1&sig=abc"));
        assert_eq!(
            store.signed(&store.container_url, "restype=container"),
            "https://acct.blob.core.windows.net/photos?restype=container&sv=1&sig=abc"
        );
        Ok(())
    }

    #[test]
    fn custom_endpoint_without_token() -> Result<()> {
        let store = AzureBlobStore::new(&settings(Some("http://127.0.0.1:10000/devstore")), "")?;
        let key = BlobKey::parse("k.png")?;
        assert_eq!(
            store.signed(&store.public_url(&key), ""),
            "http://127.0.0.1:10000/devstore/photos/k.png"
        );
        Ok(())
    }
}
