use crate::database::DbError;
use crate::database::app_user::{NewUser, User, UserRole};
use sqlx::{Executor, Postgres};

pub struct UserStore;

impl UserStore {
    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
    ) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            SELECT
                id,
                identity_provider_id,
                email,
                display_name,
                picture_url,
                role,
                created_at,
                updated_at
            FROM app_user
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Creates the user for a new identity, or refreshes the profile of a known one.
    ///
    /// New users start as consumers; the role of an existing user is left untouched.
    pub async fn upsert_by_identity(
        executor: impl Executor<'_, Database = Postgres>,
        new_user: &NewUser,
    ) -> Result<User, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            INSERT INTO app_user (identity_provider_id, email, display_name, picture_url, role)
            VALUES ($1, $2, $3, $4, 'consumer')
            ON CONFLICT (identity_provider_id) DO UPDATE
            SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                picture_url = EXCLUDED.picture_url,
                updated_at = now()
            RETURNING
                id,
                identity_provider_id,
                email,
                display_name,
                picture_url,
                role,
                created_at,
                updated_at
            "#,
        )
        .bind(&new_user.identity_provider_id)
        .bind(&new_user.email)
        .bind(&new_user.display_name)
        .bind(&new_user.picture_url)
        .fetch_one(executor)
        .await?)
    }

    pub async fn set_role(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: i32,
        role: UserRole,
    ) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            UPDATE app_user
            SET role = $1, updated_at = now()
            WHERE id = $2
            RETURNING
                id,
                identity_provider_id,
                email,
                display_name,
                picture_url,
                role,
                created_at,
                updated_at
            "#,
        )
        .bind(role)
        .bind(user_id)
        .fetch_optional(executor)
        .await?)
    }
}
