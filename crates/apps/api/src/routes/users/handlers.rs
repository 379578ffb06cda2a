use crate::api_state::ApiContext;
use crate::routes::extract::{ApiJson, ApiPath, ValidJson};
use axum::Json;
use axum::extract::State;
use common_services::api::error::ApiError;
use common_services::api::interfaces::MessageResponse;
use common_services::api::users::interfaces::{
    CreatorAccessResponse, RequestCreatorRequest, UpdateRoleRequest,
};
use common_services::api::users::service::{request_creator_access, update_user_role};

/// Change a user's role. The caller (`adminId`) must be an admin.
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "The user whose role changes.")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated.", body = MessageResponse),
        (status = 400, description = "Unknown role."),
        (status = 403, description = "Caller is not an admin."),
        (status = 404, description = "User not found."),
    )
)]
pub async fn update_role_handler(
    State(context): State<ApiContext>,
    ApiPath(user_id): ApiPath<i32>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(
        update_user_role(context.store.as_ref(), user_id, &payload).await?,
    ))
}

/// Ask for creator access. Requests are granted immediately.
#[utoipa::path(
    post,
    path = "/api/users/request-creator",
    tag = "Users",
    request_body = RequestCreatorRequest,
    responses(
        (status = 200, description = "Creator access granted.", body = CreatorAccessResponse),
        (status = 404, description = "User not found."),
    )
)]
pub async fn request_creator_handler(
    State(context): State<ApiContext>,
    ValidJson(payload): ValidJson<RequestCreatorRequest>,
) -> Result<Json<CreatorAccessResponse>, ApiError> {
    Ok(Json(
        request_creator_access(context.store.as_ref(), &payload).await?,
    ))
}
