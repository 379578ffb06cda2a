use crate::api::validation::not_blank;
use crate::database::app_user::UserProfile;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct GoogleSignInRequest {
    /// Google ID token obtained by the browser.
    #[validate(custom(function = "not_blank", message = "token is required"))]
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: UserProfile,
}
