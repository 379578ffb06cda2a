use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart body of a raw upload, for the OpenAPI docs.
#[derive(Debug, ToSchema)]
pub struct UploadFileForm {
    /// JPEG, PNG or WebP image. The first part with a file name is used.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileResponse {
    pub image_url: String,
    pub file_name: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponse {
    /// `false` when the file was already gone.
    pub deleted: bool,
    pub message: String,
}

/// A validated image read from a multipart body.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Bytes,
}
