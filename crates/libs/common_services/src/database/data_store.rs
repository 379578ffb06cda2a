use crate::database::DbError;
use crate::database::app_user::{NewUser, User, UserRole};
use crate::database::comment::{Comment, CommentWithAuthor};
use crate::database::photo::{LikeToggle, NewPhoto, Photo, PhotoUpdate, PhotoWithCreator};
use async_trait::async_trait;

/// Persistence gateway used by every service.
///
/// Implementations must make `toggle_like` atomic per photo: the like row and
/// the photo's `like_count` change together or not at all, and concurrent
/// toggles on the same photo are serialized.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), DbError>;

    /// Release pooled resources. Called once on shutdown.
    async fn close(&self);

    // Users
    async fn find_user(&self, user_id: i32) -> Result<Option<User>, DbError>;
    async fn upsert_user(&self, new_user: &NewUser) -> Result<User, DbError>;
    async fn set_user_role(&self, user_id: i32, role: UserRole) -> Result<Option<User>, DbError>;

    // Photos
    /// `search` is the raw user term; implementations match it literally and case-insensitively.
    async fn list_published_photos(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PhotoWithCreator>, DbError>;
    async fn count_published_photos(&self, search: Option<&str>) -> Result<i64, DbError>;
    async fn find_photo(&self, photo_id: &str) -> Result<Option<Photo>, DbError>;
    async fn find_published_photo(
        &self,
        photo_id: &str,
    ) -> Result<Option<PhotoWithCreator>, DbError>;
    /// Returns `false` when the photo doesn't exist or isn't published.
    async fn increment_view_count(&self, photo_id: &str) -> Result<bool, DbError>;
    async fn create_photo(&self, new_photo: &NewPhoto) -> Result<Photo, DbError>;
    async fn update_photo(
        &self,
        photo_id: &str,
        update: &PhotoUpdate,
    ) -> Result<Option<Photo>, DbError>;
    /// Deletes the photo with its comments and likes. Returns `false` if nothing was deleted.
    async fn delete_photo(&self, photo_id: &str) -> Result<bool, DbError>;

    // Interactions
    /// Returns `None` when the photo doesn't exist.
    async fn toggle_like(&self, photo_id: &str, user_id: i32)
    -> Result<Option<LikeToggle>, DbError>;
    async fn list_comments(&self, photo_id: &str) -> Result<Vec<CommentWithAuthor>, DbError>;
    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>, DbError>;
    async fn create_comment(
        &self,
        photo_id: &str,
        user_id: i32,
        text: &str,
    ) -> Result<Comment, DbError>;
    async fn delete_comment(&self, comment_id: i64) -> Result<bool, DbError>;
}
