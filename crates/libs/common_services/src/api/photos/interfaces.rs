use crate::api::validation::not_blank;
use crate::database::comment::CommentWithAuthor;
use crate::database::photo::PhotoWithCreator;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// --- Query Parameters ---

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPhotosParams {
    /// Matched against title, caption and location, case-insensitively.
    pub search: Option<String>,
    /// 1-based page number, defaults to 1.
    pub page: Option<u32>,
    /// Page size, clamped to the configured maximum.
    pub limit: Option<u32>,
}

// --- Request Payloads ---

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotoRequest {
    pub user_id: i32,
    #[validate(
        custom(function = "not_blank", message = "title is required"),
        length(max = 200)
    )]
    pub title: String,
    #[validate(
        custom(function = "not_blank", message = "imageUrl is required"),
        length(max = 2048)
    )]
    pub image_url: String,
    #[validate(length(max = 2000))]
    pub caption: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 2048))]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhotoRequest {
    pub user_id: i32,
    #[validate(
        custom(function = "not_blank", message = "title is required"),
        length(max = 200)
    )]
    pub title: String,
    #[validate(length(max = 2000))]
    pub caption: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

// --- Response Payloads ---

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoWithCreator>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotoDetailResponse {
    pub photo: PhotoWithCreator,
    pub comments: Vec<CommentWithAuthor>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotoResponse {
    pub photo_id: String,
    pub message: String,
}
