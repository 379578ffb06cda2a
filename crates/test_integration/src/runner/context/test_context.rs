use crate::runner::context::stub_identity::StubIdentityVerifier;
use api::api_state::ApiContext;
use app_state::{AppSettings, StorageBackend, load_settings_from_path};
use color_eyre::eyre::Result;
use common_services::blob::blob_store_from_settings;
use common_services::database::MemoryDataStore;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The api served on an ephemeral port, backed by the in-memory store,
/// a local blob store in a temp dir, and a stub identity verifier.
pub struct TestContext {
    pub settings: AppSettings,
    pub http_client: Client,
    pub store: Arc<MemoryDataStore>,
    /// `http://127.0.0.1:{port}/api`
    pub api_url: String,
    blob_dir: TempDir,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    api_handle: Mutex<Option<JoinHandle<()>>>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        info!("Setting up test environment...");

        let settings_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets/settings.yaml")
            .canonicalize()?;
        let mut settings = load_settings_from_path(&settings_path, false)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let blob_dir = tempfile::tempdir()?;
        settings.api.port = u32::from(addr.port());
        settings.api.public_url = format!("http://{addr}");
        settings.storage.backend = StorageBackend::Local;
        settings.storage.local_root = blob_dir.path().to_path_buf();

        let store = Arc::new(MemoryDataStore::new());
        let api_state = ApiContext {
            store: store.clone(),
            blobs: blob_store_from_settings(&settings)?,
            identity: Arc::new(StubIdentityVerifier),
            settings: settings.clone(),
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let api_handle = tokio::spawn(async move {
            let shutdown = async {
                shutdown_rx.await.ok();
            };
            if let Err(e) = api::serve_on(listener, api_state, shutdown).await {
                error!("API server failed: {}", e);
            }
        });

        info!("Test environment is ready at {}.", addr);
        Ok(Self {
            api_url: format!("http://{addr}/api"),
            settings,
            http_client: Client::new(),
            store,
            blob_dir,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            api_handle: Mutex::new(Some(api_handle)),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub fn blob_dir(&self) -> &std::path::Path {
        self.blob_dir.path()
    }

    /// Stop the server and wait for in-flight requests to finish.
    pub async fn shutdown(&self) {
        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.api_handle.lock().await.take() {
            let _ = handle.await;
        }
    }
}
