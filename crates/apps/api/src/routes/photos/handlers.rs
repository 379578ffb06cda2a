use crate::api_state::ApiContext;
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery, ValidJson};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common_services::api::error::ApiError;
use common_services::api::interactions::interfaces::{AddCommentRequest, LikeRequest, LikeResponse};
use common_services::api::interactions::service::{add_comment, toggle_like};
use common_services::api::interfaces::{CallerParams, MessageResponse};
use common_services::api::photos::interfaces::{
    CreatePhotoRequest, CreatePhotoResponse, ListPhotosParams, PhotoDetailResponse,
    PhotoListResponse, UpdatePhotoRequest,
};
use common_services::api::photos::service::{
    create_photo, delete_photo, get_photo_detail, list_photos, update_photo,
};
use common_services::database::comment::CommentWithAuthor;
use tracing::instrument;

/// List published photos, newest first.
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "Photos",
    params(ListPhotosParams),
    responses(
        (status = 200, description = "A page of published photos.", body = PhotoListResponse),
        (status = 400, description = "Invalid page."),
    )
)]
#[instrument(skip(context, params))]
pub async fn list_photos_handler(
    State(context): State<ApiContext>,
    ApiQuery(params): ApiQuery<ListPhotosParams>,
) -> Result<Json<PhotoListResponse>, ApiError> {
    let response = list_photos(
        context.store.as_ref(),
        &context.settings.pagination,
        &params,
    )
    .await?;
    Ok(Json(response))
}

/// Get a published photo with its comments. Every call counts as a view.
#[utoipa::path(
    get,
    path = "/api/photos/{photo_id}",
    tag = "Photos",
    params(
        ("photo_id" = String, Path, description = "The id of the photo.")
    ),
    responses(
        (status = 200, description = "The photo and its comments, newest first.", body = PhotoDetailResponse),
        (status = 404, description = "Photo not found or unpublished."),
    )
)]
#[instrument(skip(context))]
pub async fn get_photo_handler(
    State(context): State<ApiContext>,
    ApiPath(photo_id): ApiPath<String>,
) -> Result<Json<PhotoDetailResponse>, ApiError> {
    Ok(Json(
        get_photo_detail(context.store.as_ref(), &photo_id).await?,
    ))
}

/// Register an uploaded image as a photo. Creators only.
#[utoipa::path(
    post,
    path = "/api/photos/upload",
    tag = "Photos",
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Photo created.", body = CreatePhotoResponse),
        (status = 400, description = "Missing or invalid fields."),
        (status = 403, description = "Caller is not a creator."),
    )
)]
#[instrument(skip(context, payload))]
pub async fn create_photo_handler(
    State(context): State<ApiContext>,
    ValidJson(payload): ValidJson<CreatePhotoRequest>,
) -> Result<(StatusCode, Json<CreatePhotoResponse>), ApiError> {
    let response = create_photo(
        context.store.as_ref(),
        context.settings.constants.photo_id_length,
        &payload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/photos/{photo_id}",
    tag = "Photos",
    params(
        ("photo_id" = String, Path, description = "The id of the photo.")
    ),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Photo updated.", body = MessageResponse),
        (status = 403, description = "Caller is not the owner."),
        (status = 404, description = "Photo not found."),
    )
)]
#[instrument(skip(context, payload))]
pub async fn update_photo_handler(
    State(context): State<ApiContext>,
    ApiPath(photo_id): ApiPath<String>,
    ValidJson(payload): ValidJson<UpdatePhotoRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(
        update_photo(context.store.as_ref(), &photo_id, &payload).await?,
    ))
}

/// Delete a photo with its comments and likes. Owner or admin only.
#[utoipa::path(
    delete,
    path = "/api/photos/{photo_id}",
    tag = "Photos",
    params(
        ("photo_id" = String, Path, description = "The id of the photo."),
        CallerParams,
    ),
    responses(
        (status = 200, description = "Photo deleted.", body = MessageResponse),
        (status = 403, description = "Caller is neither owner nor admin."),
        (status = 404, description = "Photo not found."),
    )
)]
#[instrument(skip(context, caller))]
pub async fn delete_photo_handler(
    State(context): State<ApiContext>,
    ApiPath(photo_id): ApiPath<String>,
    ApiQuery(caller): ApiQuery<CallerParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(
        delete_photo(context.store.as_ref(), &photo_id, caller.user_id).await?,
    ))
}

/// Like a photo, or undo an earlier like.
#[utoipa::path(
    post,
    path = "/api/photos/{photo_id}/like",
    tag = "Interactions",
    params(
        ("photo_id" = String, Path, description = "The id of the photo.")
    ),
    request_body = LikeRequest,
    responses(
        (status = 200, description = "New like state and count.", body = LikeResponse),
        (status = 404, description = "User or photo not found."),
    )
)]
#[instrument(skip(context, payload))]
pub async fn toggle_like_handler(
    State(context): State<ApiContext>,
    ApiPath(photo_id): ApiPath<String>,
    ApiJson(payload): ApiJson<LikeRequest>,
) -> Result<Json<LikeResponse>, ApiError> {
    Ok(Json(
        toggle_like(context.store.as_ref(), &photo_id, payload.user_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/photos/{photo_id}/comments",
    tag = "Interactions",
    params(
        ("photo_id" = String, Path, description = "The id of the photo.")
    ),
    request_body = AddCommentRequest,
    responses(
        (status = 201, description = "Comment added.", body = CommentWithAuthor),
        (status = 400, description = "Empty comment."),
        (status = 404, description = "User or photo not found."),
    )
)]
#[instrument(skip(context, payload))]
pub async fn add_comment_handler(
    State(context): State<ApiContext>,
    ApiPath(photo_id): ApiPath<String>,
    ValidJson(payload): ValidJson<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentWithAuthor>), ApiError> {
    let comment = add_comment(context.store.as_ref(), &photo_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
