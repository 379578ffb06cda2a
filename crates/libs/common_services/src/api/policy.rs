//! Authorization rules shared by every handler.

use crate::database::app_user::{User, UserRole};
use crate::database::comment::Comment;
use crate::database::photo::Photo;

#[must_use]
pub fn is_admin(caller: &User) -> bool {
    caller.role == UserRole::Admin
}

#[must_use]
pub fn can_upload_photo(caller: &User) -> bool {
    caller.role == UserRole::Creator
}

#[must_use]
pub fn can_update_photo(caller: &User, photo: &Photo) -> bool {
    photo.user_id == caller.id
}

#[must_use]
pub fn can_delete_photo(caller: &User, photo: &Photo) -> bool {
    photo.user_id == caller.id || is_admin(caller)
}

/// Likes and comments are only accepted on published photos.
#[must_use]
pub const fn can_interact(photo: &Photo) -> bool {
    photo.is_published
}

/// The author, the owner of the photo, or an admin may delete a comment.
#[must_use]
pub fn can_delete_comment(caller: &User, comment: &Comment, photo: Option<&Photo>) -> bool {
    comment.user_id == caller.id
        || photo.is_some_and(|p| p.user_id == caller.id)
        || is_admin(caller)
}

#[must_use]
pub fn can_manage_roles(caller: &User) -> bool {
    is_admin(caller)
}
