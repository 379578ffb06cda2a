use crate::api_state::ApiContext;
use crate::storage::handlers::{delete_file_handler, upload_file_handler};
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{delete, post},
};

pub fn storage_public_router() -> Router<ApiContext> {
    Router::new()
        // Size is enforced while streaming the file part, see `read_image_upload`.
        .route(
            "/storage/upload",
            post(upload_file_handler).layer(DefaultBodyLimit::disable()),
        )
        .route("/storage/{file_name}", delete(delete_file_handler))
}
