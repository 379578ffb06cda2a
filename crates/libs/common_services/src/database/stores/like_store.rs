use crate::database::DbError;
use sqlx::{Executor, Postgres};

/// Rows of `photo_like`. Every call here must be paired with
/// `PhotoStore::adjust_like_count` in the same transaction.
pub struct LikeStore;

impl LikeStore {
    pub async fn insert(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
        user_id: i32,
    ) -> Result<(), DbError> {
        sqlx::query("INSERT INTO photo_like (photo_id, user_id) VALUES ($1, $2)")
            .bind(photo_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Returns the number of removed rows (0 or 1).
    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        photo_id: &str,
        user_id: i32,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM photo_like WHERE photo_id = $1 AND user_id = $2")
            .bind(photo_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
