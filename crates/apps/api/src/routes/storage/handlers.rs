use crate::routes::extract::ApiPath;
use app_state::UploadSettings;
use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use common_services::api::error::ApiError;
use common_services::api::storage::interfaces::{
    DeleteFileResponse, UploadFileForm, UploadFileResponse,
};
use common_services::api::storage::service::{delete_file, read_image_upload, store_image};
use common_services::blob::BlobStore;
use std::sync::Arc;
use tracing::instrument;

/// Upload a raw image file and get its public url.
///
/// Accepts JPEG, PNG and WebP up to the configured size. Non-file parts are ignored.
#[utoipa::path(
    post,
    path = "/api/storage/upload",
    tag = "Storage",
    request_body(content = UploadFileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored.", body = UploadFileResponse),
        (status = 400, description = "Not multipart, no file, wrong type, or too large."),
    )
)]
#[instrument(skip_all)]
pub async fn upload_file_handler(
    State(blobs): State<Arc<dyn BlobStore>>,
    State(uploads): State<UploadSettings>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadFileResponse>, ApiError> {
    let upload = read_image_upload(multipart?, &uploads).await?;
    Ok(Json(store_image(blobs.as_ref(), upload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/storage/{file_name}",
    tag = "Storage",
    params(
        ("file_name" = String, Path, description = "Key returned by the upload endpoint.")
    ),
    responses(
        (status = 200, description = "File deleted, or already absent.", body = DeleteFileResponse),
        (status = 400, description = "Not a valid file name."),
    )
)]
#[instrument(skip(blobs))]
pub async fn delete_file_handler(
    State(blobs): State<Arc<dyn BlobStore>>,
    ApiPath(file_name): ApiPath<String>,
) -> Result<Json<DeleteFileResponse>, ApiError> {
    Ok(Json(delete_file(blobs.as_ref(), &file_name).await?))
}
