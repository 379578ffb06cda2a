use serde::Deserialize;
use std::path::PathBuf;

/// Settings exactly as they appear in `settings.yaml` (plus `APP__` env overrides).
#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: ApiSettings,
    pub database: DatabaseSettings,
    pub storage: RawStorageSettings,
    pub identity: IdentitySettings,
    pub uploads: UploadSettings,
    pub pagination: PaginationSettings,
    pub constants: AppConstants,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    /// Externally reachable base url, used to build public urls for locally stored blobs.
    pub public_url: String,
    /// Hard cap on any request body. Uploads are checked against `uploads.max_file_bytes`
    /// while streaming, this only protects against absurdly large bodies.
    pub max_request_bytes: usize,
}

/// Connection pool and statement settings. Durations are in seconds unless noted.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
    pub max_lifetime: u64,
    pub statement_timeout: u64,
    pub run_migrations: bool,
    /// How often a read is retried after a transient connection error.
    pub read_retries: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Azure,
    Local,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawStorageSettings {
    pub backend: StorageBackend,
    pub container: String,
    pub account_name: String,
    /// Overrides `https://{account_name}.blob.core.windows.net`, e.g. for Azurite.
    pub endpoint: Option<String>,
    pub local_root: PathBuf,
    pub connect_timeout: u64,
    pub request_timeout: u64,
}

/// Google identity token verification.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    pub google_client_id: String,
    pub tokeninfo_url: String,
    pub connect_timeout: u64,
    pub request_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadSettings {
    pub max_file_bytes: usize,
    pub allowed_mime_types: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationSettings {
    pub default_limit: u32,
    pub max_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConstants {
    /// Length of the generated `id` of a photo.
    pub photo_id_length: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub database_url: String,
    /// Shared access signature for the blob container, without leading `?`.
    #[serde(default)]
    pub storage_sas_token: String,
}
