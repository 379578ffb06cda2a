mod api_doc;
pub mod auth;
pub mod comments;
mod extract;
pub mod photos;
pub mod root;
pub mod storage;
pub mod users;

use crate::api_state::ApiContext;
use crate::auth::router::auth_public_router;
use crate::comments::router::comments_public_router;
use crate::photos::router::photos_public_router;
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use crate::storage::router::storage_public_router;
use crate::users::router::users_public_router;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes())
        .with_state(api_state)
}

/// Everything under `/api`. Callers identify themselves by `userId`, so all routes are public.
fn api_routes() -> Router<ApiContext> {
    Router::new()
        .merge(root_public_router())
        .merge(auth_public_router())
        .merge(users_public_router())
        .merge(photos_public_router())
        .merge(comments_public_router())
        .merge(storage_public_router())
}
