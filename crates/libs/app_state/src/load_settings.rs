use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use tracing::info;

/// Load settings from `config/settings.yaml`, with `.env` and `APP__*` environment overrides.
pub fn load_app_settings() -> Result<AppSettings> {
    // Need to load from dotenv to get it to overwrite the db url from env.
    dotenv::from_path(".env").ok();
    let config_path = Path::new("config/settings.yaml").canonicalize()?;
    load_settings_from_path(&config_path, true)
}

/// Load settings from a specific yaml file.
///
/// When `use_env` is set, `APP__SECTION__KEY` environment variables override the file.
pub fn load_settings_from_path(path: &Path, use_env: bool) -> Result<AppSettings> {
    info!("Loading settings from {}", path.display());
    let mut builder = config::Config::builder().add_source(config::File::from(path));
    if use_env {
        builder = builder.add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );
    }

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    AppSettings::try_from(raw_settings)
}
