use crate::blob::BlobError;
use chrono::Utc;
use std::fmt;
use std::path::Path;

const MAX_KEY_LEN: usize = 255;
const MAX_EXTENSION_LEN: usize = 9;

/// Server-generated storage name of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobKey(String);

impl BlobKey {
    /// Build a fresh key: `{unix millis}-{6 random digits}{.ext}`.
    ///
    /// The extension comes from the client file name when it is short and alphanumeric,
    /// otherwise from the mime type. The client file name is never part of the key.
    #[must_use]
    pub fn generate(file_name: Option<&str>, mime_type: &str) -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix: u32 = rand::random_range(0..1_000_000);
        let extension = file_name
            .and_then(sanitized_extension)
            .or_else(|| extension_for_mime(mime_type).map(str::to_owned))
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        Self(format!("{millis}-{suffix:06}{extension}"))
    }

    /// Accept a key coming from a client, rejecting anything that isn't a plain file name.
    pub fn parse(raw: &str) -> Result<Self, BlobError> {
        let invalid = raw.is_empty()
            || raw.len() > MAX_KEY_LEN
            || raw.contains(['/', '\\'])
            || raw.contains("..")
            || raw.chars().any(char::is_control);
        if invalid {
            return Err(BlobError::InvalidKey(raw.to_owned()));
        }
        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sanitized_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    let valid = (1..=MAX_EXTENSION_LEN).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
