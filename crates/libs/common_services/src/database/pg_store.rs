use crate::database::app_user::{NewUser, User, UserRole};
use crate::database::comment::{Comment, CommentWithAuthor};
use crate::database::photo::{LikeToggle, NewPhoto, Photo, PhotoUpdate, PhotoWithCreator};
use crate::database::{
    CommentStore, DataStore, DbError, LikeStore, PhotoStore, RetryPolicy, UserStore,
};
use crate::utils::escape_like;
use app_state::DatabaseSettings;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Postgres implementation of [`DataStore`].
///
/// Reads go through the retry policy, writes are attempted once.
#[derive(Clone)]
pub struct PgDataStore {
    pool: Pool<Postgres>,
    retry: RetryPolicy,
}

impl PgDataStore {
    /// Build a pool that only connects on first use, so startup doesn't fail when the
    /// database is briefly unreachable.
    ///
    /// # Errors
    ///
    /// Returns an error if `database_url` can't be parsed.
    pub fn connect_lazy(database_url: &str, settings: &DatabaseSettings) -> Result<Self, DbError> {
        info!("Configuring database pool.");
        let connect_options = PgConnectOptions::from_str(database_url)?.options([(
            "statement_timeout",
            format!("{}s", settings.statement_timeout),
        )]);
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .max_lifetime(Duration::from_secs(settings.max_lifetime))
            .idle_timeout(Duration::from_secs(settings.idle_timeout))
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
            .test_before_acquire(true)
            .connect_lazy_with(connect_options);

        Ok(Self::from_pool(
            pool,
            RetryPolicy {
                max_retries: settings.read_retries,
                delay: Duration::from_millis(settings.retry_delay_ms),
            },
        ))
    }

    #[must_use]
    pub const fn from_pool(pool: Pool<Postgres>, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    #[must_use]
    pub const fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    /// Apply pending migrations from the workspace `migrations` directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails or the database is unreachable.
    pub async fn migrate(&self) -> Result<(), DbError> {
        info!("Running database migrations.");
        sqlx::migrate!("../../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn search_pattern(search: Option<&str>) -> Option<String> {
    search.map(|term| format!("%{}%", escape_like(term)))
}

#[async_trait]
impl DataStore for PgDataStore {
    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn find_user(&self, user_id: i32) -> Result<Option<User>, DbError> {
        self.retry
            .run("find_user", || UserStore::find_by_id(&self.pool, user_id))
            .await
    }

    async fn upsert_user(&self, new_user: &NewUser) -> Result<User, DbError> {
        UserStore::upsert_by_identity(&self.pool, new_user).await
    }

    async fn set_user_role(&self, user_id: i32, role: UserRole) -> Result<Option<User>, DbError> {
        UserStore::set_role(&self.pool, user_id, role).await
    }

    async fn list_published_photos(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PhotoWithCreator>, DbError> {
        let pattern = search_pattern(search);
        self.retry
            .run("list_published_photos", || {
                PhotoStore::list_published(&self.pool, pattern.as_deref(), limit, offset)
            })
            .await
    }

    async fn count_published_photos(&self, search: Option<&str>) -> Result<i64, DbError> {
        let pattern = search_pattern(search);
        self.retry
            .run("count_published_photos", || {
                PhotoStore::count_published(&self.pool, pattern.as_deref())
            })
            .await
    }

    async fn find_photo(&self, photo_id: &str) -> Result<Option<Photo>, DbError> {
        self.retry
            .run("find_photo", || PhotoStore::find_by_id(&self.pool, photo_id))
            .await
    }

    async fn find_published_photo(
        &self,
        photo_id: &str,
    ) -> Result<Option<PhotoWithCreator>, DbError> {
        self.retry
            .run("find_published_photo", || {
                PhotoStore::find_published_with_creator(&self.pool, photo_id)
            })
            .await
    }

    async fn increment_view_count(&self, photo_id: &str) -> Result<bool, DbError> {
        let updated = PhotoStore::increment_view_count(&self.pool, photo_id).await?;
        Ok(updated > 0)
    }

    async fn create_photo(&self, new_photo: &NewPhoto) -> Result<Photo, DbError> {
        PhotoStore::create(&self.pool, new_photo).await
    }

    async fn update_photo(
        &self,
        photo_id: &str,
        update: &PhotoUpdate,
    ) -> Result<Option<Photo>, DbError> {
        PhotoStore::update_details(&self.pool, photo_id, update).await
    }

    async fn delete_photo(&self, photo_id: &str) -> Result<bool, DbError> {
        let deleted = PhotoStore::delete(&self.pool, photo_id).await?;
        Ok(deleted > 0)
    }

    async fn toggle_like(
        &self,
        photo_id: &str,
        user_id: i32,
    ) -> Result<Option<LikeToggle>, DbError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent toggles on the same photo.
        if !PhotoStore::lock_for_update(&mut *tx, photo_id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let removed = LikeStore::delete(&mut *tx, photo_id, user_id).await?;
        let (liked, delta) = if removed > 0 {
            (false, -1)
        } else {
            LikeStore::insert(&mut *tx, photo_id, user_id).await?;
            (true, 1)
        };
        let like_count = PhotoStore::adjust_like_count(&mut *tx, photo_id, delta).await?;

        tx.commit().await?;
        Ok(Some(LikeToggle { liked, like_count }))
    }

    async fn list_comments(&self, photo_id: &str) -> Result<Vec<CommentWithAuthor>, DbError> {
        self.retry
            .run("list_comments", || {
                CommentStore::list_for_photo(&self.pool, photo_id)
            })
            .await
    }

    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>, DbError> {
        self.retry
            .run("find_comment", || {
                CommentStore::find_by_id(&self.pool, comment_id)
            })
            .await
    }

    async fn create_comment(
        &self,
        photo_id: &str,
        user_id: i32,
        text: &str,
    ) -> Result<Comment, DbError> {
        CommentStore::create(&self.pool, photo_id, user_id, text).await
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool, DbError> {
        let deleted = CommentStore::delete(&self.pool, comment_id).await?;
        Ok(deleted > 0)
    }
}
