use crate::api_state::ApiContext;
use crate::routes::extract::{ApiPath, ApiQuery};
use axum::Json;
use axum::extract::State;
use common_services::api::error::ApiError;
use common_services::api::interactions::service::delete_comment;
use common_services::api::interfaces::{CallerParams, MessageResponse};
use tracing::instrument;

/// Delete a comment as its author, the photo's owner, or an admin.
#[utoipa::path(
    delete,
    path = "/api/comments/{comment_id}",
    tag = "Interactions",
    params(
        ("comment_id" = i64, Path, description = "The id of the comment."),
        CallerParams,
    ),
    responses(
        (status = 200, description = "Comment deleted.", body = MessageResponse),
        (status = 403, description = "Caller may not delete this comment."),
        (status = 404, description = "Comment not found."),
    )
)]
#[instrument(skip(context, caller))]
pub async fn delete_comment_handler(
    State(context): State<ApiContext>,
    ApiPath(comment_id): ApiPath<i64>,
    ApiQuery(caller): ApiQuery<CallerParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(
        delete_comment(context.store.as_ref(), comment_id, caller.user_id).await?,
    ))
}
