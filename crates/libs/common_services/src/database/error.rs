use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database could not be reached, or no connection became available in time.
    #[error("Database unavailable: {0}")]
    Connection(sqlx::Error),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(sqlx::Error),

    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    /// Whether retrying the same statement later could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::Connection(err),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation(err)
            }
            _ => Self::Sqlx(err),
        }
    }
}
