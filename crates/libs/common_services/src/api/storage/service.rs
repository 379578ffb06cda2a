use crate::api::error::ApiError;
use crate::api::storage::interfaces::{DeleteFileResponse, ImageUpload, UploadFileResponse};
use crate::blob::{BlobKey, BlobStore, DeleteOutcome};
use app_state::UploadSettings;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use bytes::BytesMut;
use tracing::{debug, info, instrument};

struct FilePart {
    file_name: Option<String>,
    mime_type: String,
    allowed: bool,
    size: usize,
    bytes: BytesMut,
}

/// Lowercase the mime type and map `image/jpg` to `image/jpeg`.
fn normalize_mime(mime: &str) -> String {
    let mime = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if mime == "image/jpg" {
        "image/jpeg".to_owned()
    } else {
        mime
    }
}

fn part_mime(content_type: Option<&str>, file_name: Option<&str>) -> String {
    content_type
        .filter(|ct| !ct.trim().is_empty())
        .map(str::to_owned)
        .or_else(|| {
            file_name
                .and_then(|name| mime_guess::from_path(name).first_raw())
                .map(str::to_owned)
        })
        .map(|mime| normalize_mime(&mime))
        .unwrap_or_default()
}

/// The error for a file over `max_file_bytes`, also used when the body hits the
/// request size cap.
#[must_use]
pub fn file_too_large(settings: &UploadSettings) -> ApiError {
    ApiError::validation(format!(
        "File size exceeds {}MB limit",
        settings.max_file_bytes / (1024 * 1024)
    ))
}

fn read_error(err: MultipartError, settings: &UploadSettings) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        file_too_large(settings)
    } else {
        err.into()
    }
}

/// Read the first file part of a multipart body and check its type and size.
///
/// The whole body is always consumed, so an oversized or rejected file still lets the
/// client finish sending before the error response goes out. Only allowed files within
/// the size limit are buffered.
#[instrument(skip_all, err(Debug))]
pub async fn read_image_upload(
    mut multipart: Multipart,
    settings: &UploadSettings,
) -> Result<ImageUpload, ApiError> {
    let mut file: Option<FilePart> = None;

    let read_err = |e| read_error(e, settings);

    while let Some(mut field) = multipart.next_field().await.map_err(read_err)? {
        if file.is_some() || field.file_name().is_none() {
            debug!("Skipping multipart field {:?}", field.name());
            while field.chunk().await.map_err(read_err)?.is_some() {}
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let mime_type = part_mime(field.content_type(), file_name.as_deref());
        let allowed = settings.is_allowed_mime(&mime_type);
        let mut part = FilePart {
            file_name,
            mime_type,
            allowed,
            size: 0,
            bytes: BytesMut::new(),
        };
        while let Some(chunk) = field.chunk().await.map_err(read_err)? {
            part.size += chunk.len();
            if part.allowed && part.size <= settings.max_file_bytes {
                part.bytes.extend_from_slice(&chunk);
            }
        }
        file = Some(part);
    }

    let Some(part) = file else {
        return Err(ApiError::validation("No file uploaded"));
    };
    if !part.allowed {
        return Err(ApiError::UnsupportedMedia(
            "Invalid file type. Only JPEG, PNG, and WebP are allowed.".to_owned(),
        ));
    }
    if part.size > settings.max_file_bytes {
        return Err(file_too_large(settings));
    }
    if part.size == 0 {
        return Err(ApiError::validation("Uploaded file is empty"));
    }

    Ok(ImageUpload {
        file_name: part.file_name,
        mime_type: part.mime_type,
        bytes: part.bytes.freeze(),
    })
}

/// Store an image under a fresh key.
#[instrument(skip(blobs, upload), fields(size = upload.bytes.len()), err(Debug))]
pub async fn store_image(
    blobs: &dyn BlobStore,
    upload: ImageUpload,
) -> Result<UploadFileResponse, ApiError> {
    let key = BlobKey::generate(upload.file_name.as_deref(), &upload.mime_type);
    let image_url = blobs.store(&key, upload.bytes, &upload.mime_type).await?;
    info!("Stored upload as {}", key);

    Ok(UploadFileResponse {
        image_url,
        file_name: key.to_string(),
        message: "File uploaded successfully".to_owned(),
    })
}

#[instrument(skip(blobs), err(Debug))]
pub async fn delete_file(
    blobs: &dyn BlobStore,
    file_name: &str,
) -> Result<DeleteFileResponse, ApiError> {
    let key = BlobKey::parse(file_name).map_err(|_| ApiError::validation("Invalid file name"))?;

    Ok(match blobs.delete(&key).await? {
        DeleteOutcome::Deleted => DeleteFileResponse {
            deleted: true,
            message: "File deleted successfully".to_owned(),
        },
        DeleteOutcome::NotFound => DeleteFileResponse {
            deleted: false,
            message: "File not found".to_owned(),
        },
    })
}
