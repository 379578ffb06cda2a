use crate::blob::BlobError;
use crate::database::DbError;
use crate::identity::IdentityError;
use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Error type of every service and handler. Renders as `{ "error": message }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    Validation(String),

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database unavailable")]
    Unavailable(#[source] DbError),

    #[error("Database error")]
    Database(#[source] DbError),

    #[error("Blob storage error")]
    Storage(#[from] BlobError),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

fn log_error(error: &ApiError) {
    match error {
        ApiError::Validation(message) => warn!("Bad request: {}", message),
        ApiError::UnsupportedMedia(message) => warn!("Unsupported upload: {}", message),
        ApiError::NotFound(message) => warn!("Not found: {}", message),
        ApiError::Forbidden(message) => warn!("Forbidden: {}", message),
        ApiError::Unauthorized(message) => warn!("Unauthorized: {}", message),
        ApiError::Unavailable(e) => error!("Database unavailable: {}", e),
        ApiError::Database(e) => error!("Database query failed: {}", e),
        ApiError::Storage(e) => error!("Blob storage failed: {}", e),
        ApiError::Internal(e) => error!("Internal error: {:?}", e),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::Validation(message) | Self::UnsupportedMedia(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            Self::Unavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable.".to_owned(),
            ),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.".to_owned(),
            ),
            Self::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A storage error occurred.".to_owned(),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.".to_owned(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        if err.is_transient() {
            Self::Unavailable(err)
        } else {
            Self::Database(err)
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken(reason) => {
                warn!("Identity token rejected: {}", reason);
                Self::Unauthorized("Authentication failed".to_owned())
            }
            other => Self::Internal(eyre::Report::new(other)),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(ToString::to_string))
                    .unwrap_or_else(|| {
                        errs.first()
                            .map_or_else(|| "invalid".to_owned(), |e| e.code.to_string())
                    });
                format!("{field}: {reason}")
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join(", "))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::UnsupportedMedia(format!(
            "Content-Type must be multipart/form-data ({})",
            rejection.body_text()
        ))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_become_503() {
        let err = ApiError::from(DbError::from(sqlx::Error::PoolTimedOut));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn statement_errors_become_500() {
        let err = ApiError::from(DbError::from(sqlx::Error::RowNotFound));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_tokens_become_401() {
        let err = ApiError::from(IdentityError::InvalidToken("expired".to_owned()));
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
