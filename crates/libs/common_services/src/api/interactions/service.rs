use crate::api::error::ApiError;
use crate::api::interactions::interfaces::{AddCommentRequest, LikeResponse};
use crate::api::interfaces::MessageResponse;
use crate::api::policy::{can_delete_comment, can_interact};
use crate::database::DataStore;
use crate::database::comment::CommentWithAuthor;
use tracing::{info, instrument};

/// Like the photo, or remove the like if the user already liked it.
#[instrument(skip(store), err(Debug))]
pub async fn toggle_like(
    store: &dyn DataStore,
    photo_id: &str,
    user_id: i32,
) -> Result<LikeResponse, ApiError> {
    if store.find_user(user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }
    let open = store
        .find_photo(photo_id)
        .await?
        .is_some_and(|p| can_interact(&p));
    if !open {
        return Err(ApiError::not_found("Photo not found"));
    }

    let toggle = store
        .toggle_like(photo_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;

    Ok(LikeResponse {
        liked: toggle.liked,
        like_count: toggle.like_count,
        message: if toggle.liked {
            "Photo liked"
        } else {
            "Photo unliked"
        }
        .to_owned(),
    })
}

/// Store a trimmed comment on a published photo and return it with its author.
#[instrument(skip(store, request), fields(user_id = request.user_id), err(Debug))]
pub async fn add_comment(
    store: &dyn DataStore,
    photo_id: &str,
    request: &AddCommentRequest,
) -> Result<CommentWithAuthor, ApiError> {
    let author = store
        .find_user(request.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let open = store
        .find_photo(photo_id)
        .await?
        .is_some_and(|p| can_interact(&p));
    if !open {
        return Err(ApiError::not_found("Photo not found"));
    }

    let comment = store
        .create_comment(photo_id, author.id, request.text.trim())
        .await?;

    Ok(CommentWithAuthor {
        comment,
        user_name: author.display_name,
        user_picture: author.picture_url,
    })
}

/// Delete a comment as its author, the photo owner, or an admin.
#[instrument(skip(store), err(Debug))]
pub async fn delete_comment(
    store: &dyn DataStore,
    comment_id: i64,
    caller_id: i32,
) -> Result<MessageResponse, ApiError> {
    let comment = store
        .find_comment(comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;
    let Some(caller) = store.find_user(caller_id).await? else {
        return Err(ApiError::forbidden("Unauthorized"));
    };
    let photo = store.find_photo(&comment.photo_id).await?;
    if !can_delete_comment(&caller, &comment, photo.as_ref()) {
        return Err(ApiError::forbidden("Unauthorized"));
    }

    if !store.delete_comment(comment_id).await? {
        return Err(ApiError::not_found("Comment not found"));
    }
    info!("Comment {} deleted by user {}", comment_id, caller_id);

    Ok(MessageResponse::new("Comment deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDataStore;
    use crate::database::app_user::{NewUser, UserRole};
    use crate::database::photo::NewPhoto;
    use color_eyre::Result;

    async fn user(store: &MemoryDataStore, sub: &str, role: UserRole) -> Result<i32> {
        let user = store
            .upsert_user(&NewUser {
                identity_provider_id: sub.to_owned(),
                email: format!("{sub}@example.com"),
                display_name: sub.to_owned(),
                picture_url: None,
            })
            .await?;
        store.set_user_role(user.id, role).await?;
        Ok(user.id)
    }

    async fn photo(store: &MemoryDataStore, owner: i32) -> Result<String> {
        let photo = store
            .create_photo(&NewPhoto {
                id: "photo1".to_owned(),
                user_id: owner,
                title: "Beach".to_owned(),
                caption: None,
                location: None,
                image_url: "https://cdn.example.com/a.jpg".to_owned(),
                thumbnail_url: None,
            })
            .await?;
        Ok(photo.id)
    }

    fn comment(user_id: i32, text: &str) -> AddCommentRequest {
        AddCommentRequest {
            user_id,
            text: text.to_owned(),
        }
    }

    #[tokio::test]
    async fn like_twice_restores_count() -> Result<()> {
        let store = MemoryDataStore::new();
        let owner = user(&store, "owner", UserRole::Creator).await?;
        let id = photo(&store, owner).await?;

        let first = toggle_like(&store, &id, owner).await?;
        assert!(first.liked);
        assert_eq!(first.like_count, 1);

        let second = toggle_like(&store, &id, owner).await?;
        assert!(!second.liked);
        assert_eq!(second.like_count, 0);

        assert!(matches!(
            toggle_like(&store, &id, 999).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            toggle_like(&store, "missing", owner).await,
            Err(ApiError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn comments_are_trimmed_and_attributed() -> Result<()> {
        let store = MemoryDataStore::new();
        let owner = user(&store, "owner", UserRole::Creator).await?;
        let id = photo(&store, owner).await?;

        let added = add_comment(&store, &id, &comment(owner, "  hi  ")).await?;
        assert_eq!(added.comment.text, "hi");
        assert_eq!(added.user_name, "owner");

        assert!(matches!(
            add_comment(&store, "missing", &comment(owner, "hi")).await,
            Err(ApiError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn photo_owner_deletes_others_comments() -> Result<()> {
        let store = MemoryDataStore::new();
        let owner = user(&store, "owner", UserRole::Creator).await?;
        let commenter = user(&store, "commenter", UserRole::Consumer).await?;
        let stranger = user(&store, "stranger", UserRole::Consumer).await?;
        let id = photo(&store, owner).await?;

        let added = add_comment(&store, &id, &comment(commenter, "nice")).await?;
        let comment_id = added.comment.id;

        assert!(matches!(
            delete_comment(&store, comment_id, stranger).await,
            Err(ApiError::Forbidden(_))
        ));
        delete_comment(&store, comment_id, owner).await?;
        assert!(store.find_comment(comment_id).await?.is_none());
        assert!(matches!(
            delete_comment(&store, comment_id, owner).await,
            Err(ApiError::NotFound(_))
        ));
        Ok(())
    }
}
