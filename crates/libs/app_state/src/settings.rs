use crate::{
    ApiSettings, AppConstants, DatabaseSettings, IdentitySettings, LoggingSettings,
    PaginationSettings, RawSettings, SecretSettings, StorageBackend, UploadSettings,
};
use color_eyre::eyre::{Result, WrapErr, bail};
use serde::Deserialize;
use std::path::{PathBuf, absolute};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub identity: IdentitySettings,
    pub uploads: UploadSettings,
    pub pagination: PaginationSettings,
    pub constants: AppConstants,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
}

/// Blob storage settings with the local root resolved to an absolute path.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub container: String,
    pub account_name: String,
    pub endpoint: Option<String>,
    pub local_root: PathBuf,
    pub connect_timeout: u64,
    pub request_timeout: u64,
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawSettings) -> Result<Self> {
        let local_root = absolute(&raw.storage.local_root)
            .wrap_err_with(|| format!("Invalid local_root {:?}", raw.storage.local_root))?;

        if raw.pagination.default_limit == 0
            || raw.pagination.default_limit > raw.pagination.max_limit
        {
            bail!(
                "pagination.default_limit must be between 1 and max_limit ({})",
                raw.pagination.max_limit
            );
        }
        if raw.database.min_connections > raw.database.max_connections {
            bail!("database.min_connections cannot exceed database.max_connections");
        }

        let mut api = raw.api;
        api.public_url = api.public_url.trim_end_matches('/').to_owned();

        let mut uploads = raw.uploads;
        uploads.allowed_mime_types = uploads
            .allowed_mime_types
            .iter()
            .map(|m| m.trim().to_lowercase())
            .collect();

        Ok(Self {
            api,
            database: raw.database,
            storage: StorageSettings {
                backend: raw.storage.backend,
                container: raw.storage.container,
                account_name: raw.storage.account_name,
                endpoint: raw
                    .storage
                    .endpoint
                    .map(|e| e.trim_end_matches('/').to_owned())
                    .filter(|e| !e.is_empty()),
                local_root,
                connect_timeout: raw.storage.connect_timeout,
                request_timeout: raw.storage.request_timeout,
            },
            identity: raw.identity,
            uploads,
            pagination: raw.pagination,
            constants: raw.constants,
            logging: raw.logging,
            secrets: raw.secrets,
        })
    }
}

impl StorageSettings {
    /// Base url of the blob service, without the container.
    #[must_use]
    pub fn blob_endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| {
            format!("https://{}.blob.core.windows.net", self.account_name)
        })
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl IdentitySettings {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl UploadSettings {
    #[must_use]
    pub fn is_allowed_mime(&self, mime: &str) -> bool {
        let mime = mime.trim().to_lowercase();
        self.allowed_mime_types.iter().any(|m| *m == mime)
    }
}

impl PaginationSettings {
    /// Resolve the requested limit, falling back to the default and clamping to `max_limit`.
    #[must_use]
    pub fn resolve_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit)
    }
}
