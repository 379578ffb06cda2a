pub mod app_user;
pub mod comment;
pub mod photo;
