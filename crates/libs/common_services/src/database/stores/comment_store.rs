use crate::database::DbError;
use crate::database::comment::{Comment, CommentWithAuthor};
use sqlx::{Executor, Postgres};

pub struct CommentStore;

impl CommentStore {
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
        user_id: i32,
        text: &str,
    ) -> Result<Comment, DbError> {
        Ok(sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comment (photo_id, user_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, photo_id, user_id, text, created_at
            "#,
        )
        .bind(photo_id)
        .bind(user_id)
        .bind(text)
        .fetch_one(executor)
        .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        comment_id: i64,
    ) -> Result<Option<Comment>, DbError> {
        Ok(sqlx::query_as::<_, Comment>(
            "SELECT id, photo_id, user_id, text, created_at FROM comment WHERE id = $1",
        )
        .bind(comment_id)
        .fetch_optional(executor)
        .await?)
    }

    /// All comments of a photo, newest first.
    pub async fn list_for_photo(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
    ) -> Result<Vec<CommentWithAuthor>, DbError> {
        Ok(sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT
                c.id, c.photo_id, c.user_id, c.text, c.created_at,
                u.display_name AS user_name,
                u.picture_url AS user_picture
            FROM comment c
            JOIN app_user u ON u.id = c.user_id
            WHERE c.photo_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(photo_id)
        .fetch_all(executor)
        .await?)
    }

    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        comment_id: i64,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM comment WHERE id = $1")
            .bind(comment_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
