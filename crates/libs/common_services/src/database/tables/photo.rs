use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row of the `photo` table.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(rename = "photoId")]
    pub id: String,
    pub user_id: i32,
    pub title: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A photo joined with the public profile of its creator.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoWithCreator {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub photo: Photo,
    pub creator_name: String,
    pub creator_picture: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub id: String,
    pub user_id: i32,
    pub title: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
}

/// Owner-editable fields. `None` clears the optional columns.
#[derive(Debug, Clone)]
pub struct PhotoUpdate {
    pub title: String,
    pub caption: Option<String>,
    pub location: Option<String>,
}

/// Result of toggling a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
}
