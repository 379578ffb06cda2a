use crate::database::DbError;
use crate::database::photo::{NewPhoto, Photo, PhotoUpdate, PhotoWithCreator};
use sqlx::{Executor, Postgres};

pub struct PhotoStore;

impl PhotoStore {
    //================================================================================
    // Reads
    //================================================================================

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
    ) -> Result<Option<Photo>, DbError> {
        Ok(sqlx::query_as::<_, Photo>(
            r#"
            SELECT
                id, user_id, title, caption, location, image_url, thumbnail_url,
                view_count, like_count, is_published, created_at, updated_at
            FROM photo
            WHERE id = $1
            "#,
        )
        .bind(photo_id)
        .fetch_optional(executor)
        .await?)
    }

    pub async fn find_published_with_creator(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
    ) -> Result<Option<PhotoWithCreator>, DbError> {
        Ok(sqlx::query_as::<_, PhotoWithCreator>(
            r#"
            SELECT
                p.id, p.user_id, p.title, p.caption, p.location, p.image_url, p.thumbnail_url,
                p.view_count, p.like_count, p.is_published, p.created_at, p.updated_at,
                u.display_name AS creator_name,
                u.picture_url AS creator_picture
            FROM photo p
            JOIN app_user u ON u.id = p.user_id
            WHERE p.id = $1 AND p.is_published
            "#,
        )
        .bind(photo_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Lists a page of published photos, newest first.
    ///
    /// `pattern` is an already escaped `ILIKE` pattern matched against title, caption and location.
    pub async fn list_published(
        executor: impl Executor<'_, Database = Postgres>,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PhotoWithCreator>, DbError> {
        Ok(sqlx::query_as::<_, PhotoWithCreator>(
            r#"
            SELECT
                p.id, p.user_id, p.title, p.caption, p.location, p.image_url, p.thumbnail_url,
                p.view_count, p.like_count, p.is_published, p.created_at, p.updated_at,
                u.display_name AS creator_name,
                u.picture_url AS creator_picture
            FROM photo p
            JOIN app_user u ON u.id = p.user_id
            WHERE p.is_published
              AND (
                $1::text IS NULL
                OR p.title ILIKE $1
                OR p.caption ILIKE $1
                OR p.location ILIKE $1
              )
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?)
    }

    pub async fn count_published(
        executor: impl Executor<'_, Database = Postgres>,
        pattern: Option<&str>,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM photo p
            WHERE p.is_published
              AND (
                $1::text IS NULL
                OR p.title ILIKE $1
                OR p.caption ILIKE $1
                OR p.location ILIKE $1
              )
            "#,
        )
        .bind(pattern)
        .fetch_one(executor)
        .await?)
    }

    /// Locks the photo row for the rest of the transaction. Returns `false` if it doesn't exist.
    pub async fn lock_for_update(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
    ) -> Result<bool, DbError> {
        let locked = sqlx::query_scalar::<_, String>("SELECT id FROM photo WHERE id = $1 FOR UPDATE")
            .bind(photo_id)
            .fetch_optional(executor)
            .await?;
        Ok(locked.is_some())
    }

    //================================================================================
    // Writes
    //================================================================================

    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        new_photo: &NewPhoto,
    ) -> Result<Photo, DbError> {
        Ok(sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photo (id, user_id, title, caption, location, image_url, thumbnail_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, user_id, title, caption, location, image_url, thumbnail_url,
                view_count, like_count, is_published, created_at, updated_at
            "#,
        )
        .bind(&new_photo.id)
        .bind(new_photo.user_id)
        .bind(&new_photo.title)
        .bind(&new_photo.caption)
        .bind(&new_photo.location)
        .bind(&new_photo.image_url)
        .bind(&new_photo.thumbnail_url)
        .fetch_one(executor)
        .await?)
    }

    pub async fn update_details(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
        update: &PhotoUpdate,
    ) -> Result<Option<Photo>, DbError> {
        Ok(sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photo
            SET title = $1, caption = $2, location = $3, updated_at = now()
            WHERE id = $4
            RETURNING
                id, user_id, title, caption, location, image_url, thumbnail_url,
                view_count, like_count, is_published, created_at, updated_at
            "#,
        )
        .bind(&update.title)
        .bind(&update.caption)
        .bind(&update.location)
        .bind(photo_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Deletes a photo. Comments and likes go with it through `ON DELETE CASCADE`.
    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM photo WHERE id = $1")
            .bind(photo_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Blind increment; concurrent fetches may interleave freely.
    pub async fn increment_view_count(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            "UPDATE photo SET view_count = view_count + 1 WHERE id = $1 AND is_published",
        )
        .bind(photo_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Only call inside the transaction that inserted or deleted the matching like row.
    pub async fn adjust_like_count(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
        delta: i64,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(
            "UPDATE photo SET like_count = like_count + $1 WHERE id = $2 RETURNING like_count",
        )
        .bind(delta)
        .bind(photo_id)
        .fetch_one(executor)
        .await?)
    }
}
