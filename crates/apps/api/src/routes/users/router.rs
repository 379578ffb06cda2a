use crate::api_state::ApiContext;
use crate::users::handlers::{request_creator_handler, update_role_handler};
use axum::{
    Router,
    routing::{post, put},
};

pub fn users_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/users/{id}/role", put(update_role_handler))
        .route("/users/request-creator", post(request_creator_handler))
}
