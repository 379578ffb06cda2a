use crate::api_state::ApiContext;
use crate::auth::handlers::{get_user_handler, google_sign_in_handler};
use axum::{
    Router,
    routing::{get, post},
};

pub fn auth_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/auth/google", post(google_sign_in_handler))
        .route("/auth/user/{id}", get(get_user_handler))
}
