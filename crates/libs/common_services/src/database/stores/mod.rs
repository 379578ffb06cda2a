mod comment_store;
mod like_store;
mod photo_store;
mod user_store;

pub use comment_store::CommentStore;
pub use like_store::LikeStore;
pub use photo_store::PhotoStore;
pub use user_store::UserStore;
