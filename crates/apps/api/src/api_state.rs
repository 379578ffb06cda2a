use app_state::{AppSettings, UploadSettings};
use axum::extract::FromRef;
use common_services::blob::BlobStore;
use common_services::database::DataStore;
use common_services::identity::IdentityVerifier;
use std::sync::Arc;

/// Shared state of every handler. The gateways are constructed once at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn DataStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub settings: AppSettings,
}

impl FromRef<ApiContext> for Arc<dyn DataStore> {
    fn from_ref(state: &ApiContext) -> Self {
        state.store.clone()
    }
}

impl FromRef<ApiContext> for Arc<dyn BlobStore> {
    fn from_ref(state: &ApiContext) -> Self {
        state.blobs.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}

impl FromRef<ApiContext> for UploadSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.uploads.clone()
    }
}
