use crate::api_state::ApiContext;
use crate::routes::extract::{ApiPath, ValidJson};
use axum::Json;
use axum::extract::State;
use common_services::api::auth::interfaces::{AuthResponse, GoogleSignInRequest, UserResponse};
use common_services::api::auth::service::{get_user, sign_in_with_google};
use common_services::api::error::ApiError;

/// Sign in with a Google ID token.
///
/// Creates the user on first sign-in (as a consumer) and refreshes email, name and picture
/// on later sign-ins.
#[utoipa::path(
    post,
    path = "/api/auth/google",
    tag = "Auth",
    request_body = GoogleSignInRequest,
    responses(
        (status = 200, description = "Signed in.", body = AuthResponse),
        (status = 400, description = "Token missing."),
        (status = 401, description = "Token rejected."),
    )
)]
pub async fn google_sign_in_handler(
    State(context): State<ApiContext>,
    ValidJson(payload): ValidJson<GoogleSignInRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response =
        sign_in_with_google(context.store.as_ref(), context.identity.as_ref(), &payload.token)
            .await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/auth/user/{id}",
    tag = "Auth",
    params(
        ("id" = i32, Path, description = "The id of the user.")
    ),
    responses(
        (status = 200, description = "The public profile of the user.", body = UserResponse),
        (status = 404, description = "User not found."),
    )
)]
pub async fn get_user_handler(
    State(context): State<ApiContext>,
    ApiPath(user_id): ApiPath<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(get_user(context.store.as_ref(), user_id).await?))
}
