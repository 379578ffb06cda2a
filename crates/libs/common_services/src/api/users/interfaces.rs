use crate::database::app_user::UserProfile;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub admin_id: i32,
    /// One of `consumer`, `creator`, `admin`.
    pub new_role: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestCreatorRequest {
    pub user_id: i32,
    /// Logged, never stored.
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatorAccessResponse {
    pub message: String,
    pub user: UserProfile,
}
