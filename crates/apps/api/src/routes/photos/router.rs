use crate::api_state::ApiContext;
use crate::photos::handlers::{
    add_comment_handler, create_photo_handler, delete_photo_handler, get_photo_handler,
    list_photos_handler, toggle_like_handler, update_photo_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

pub fn photos_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/photos", get(list_photos_handler))
        .route("/photos/upload", post(create_photo_handler))
        .route(
            "/photos/{photo_id}",
            get(get_photo_handler)
                .put(update_photo_handler)
                .delete(delete_photo_handler),
        )
        .route("/photos/{photo_id}/like", post(toggle_like_handler))
        .route("/photos/{photo_id}/comments", post(add_comment_handler))
}
