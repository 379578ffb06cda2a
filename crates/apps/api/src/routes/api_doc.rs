use crate::routes::{auth, comments, photos, root, storage, users};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Auth handlers
        auth::handlers::google_sign_in_handler,
        auth::handlers::get_user_handler,
        // User handlers
        users::handlers::update_role_handler,
        users::handlers::request_creator_handler,
        // Photo handlers
        photos::handlers::list_photos_handler,
        photos::handlers::get_photo_handler,
        photos::handlers::create_photo_handler,
        photos::handlers::update_photo_handler,
        photos::handlers::delete_photo_handler,
        photos::handlers::toggle_like_handler,
        photos::handlers::add_comment_handler,
        // Comment handlers
        comments::handlers::delete_comment_handler,
        // Storage handlers
        storage::handlers::upload_file_handler,
        storage::handlers::delete_file_handler,
    ),
    tags(
        (name = "Auth", description = "Google sign-in and user lookup"),
        (name = "Users", description = "Role management"),
        (name = "Photos", description = "Browsing and managing photos"),
        (name = "Interactions", description = "Likes and comments"),
        (name = "Storage", description = "Raw image upload and deletion"),
        (name = "System", description = "Liveness and health check"),
    )
)]
pub struct ApiDoc;
