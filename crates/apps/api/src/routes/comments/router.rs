use crate::api_state::ApiContext;
use crate::comments::handlers::delete_comment_handler;
use axum::{Router, routing::delete};

pub fn comments_public_router() -> Router<ApiContext> {
    Router::new().route("/comments/{comment_id}", delete(delete_comment_handler))
}
