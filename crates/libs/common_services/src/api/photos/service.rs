use crate::api::error::ApiError;
use crate::api::interfaces::MessageResponse;
use crate::api::photos::interfaces::{
    CreatePhotoRequest, CreatePhotoResponse, ListPhotosParams, Pagination, PhotoDetailResponse,
    PhotoListResponse, UpdatePhotoRequest,
};
use crate::api::policy::{can_delete_photo, can_update_photo, can_upload_photo};
use crate::api::validation::trimmed;
use crate::database::DataStore;
use crate::database::photo::{NewPhoto, PhotoUpdate};
use crate::utils::nice_id;
use app_state::PaginationSettings;
use tracing::{info, instrument};

/// Resolve page/limit into `(page, limit, offset)`.
fn resolve_page(
    params: &ListPhotosParams,
    settings: &PaginationSettings,
) -> Result<(u32, u32, i64), ApiError> {
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::validation("page must be 1 or greater"));
    }
    let limit = settings.resolve_limit(params.limit);
    let offset = i64::from(page - 1) * i64::from(limit);
    Ok((page, limit, offset))
}

fn total_pages(total: i64, limit: u32) -> u64 {
    u64::try_from(total).unwrap_or(0).div_ceil(u64::from(limit))
}

/// A page of published photos, newest first, with the total match count.
#[instrument(skip(store, settings), err(Debug))]
pub async fn list_photos(
    store: &dyn DataStore,
    settings: &PaginationSettings,
    params: &ListPhotosParams,
) -> Result<PhotoListResponse, ApiError> {
    let (page, limit, offset) = resolve_page(params, settings)?;
    let search = trimmed(params.search.as_deref());

    let (photos, total) = tokio::join!(
        store.list_published_photos(search.as_deref(), i64::from(limit), offset),
        store.count_published_photos(search.as_deref()),
    );
    let photos = photos?;
    let total = total?;

    Ok(PhotoListResponse {
        photos,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        },
    })
}

/// Fetch a published photo with its comments. Counts as a view.
#[instrument(skip(store), err(Debug))]
pub async fn get_photo_detail(
    store: &dyn DataStore,
    photo_id: &str,
) -> Result<PhotoDetailResponse, ApiError> {
    if !store.increment_view_count(photo_id).await? {
        return Err(ApiError::not_found("Photo not found"));
    }

    let (photo, comments) = tokio::join!(
        store.find_published_photo(photo_id),
        store.list_comments(photo_id),
    );
    let photo = photo?.ok_or_else(|| ApiError::not_found("Photo not found"))?;

    Ok(PhotoDetailResponse {
        photo,
        comments: comments?,
    })
}

#[instrument(skip(store, request), fields(user_id = request.user_id), err(Debug))]
pub async fn create_photo(
    store: &dyn DataStore,
    photo_id_length: usize,
    request: &CreatePhotoRequest,
) -> Result<CreatePhotoResponse, ApiError> {
    let is_creator = store
        .find_user(request.user_id)
        .await?
        .is_some_and(|caller| can_upload_photo(&caller));
    if !is_creator {
        return Err(ApiError::forbidden("Only creators can upload photos"));
    }

    let photo = store
        .create_photo(&NewPhoto {
            id: nice_id(photo_id_length),
            user_id: request.user_id,
            title: request.title.trim().to_owned(),
            caption: trimmed(request.caption.as_deref()),
            location: trimmed(request.location.as_deref()),
            image_url: request.image_url.trim().to_owned(),
            thumbnail_url: trimmed(request.thumbnail_url.as_deref()),
        })
        .await?;
    info!("Photo {} created by user {}", photo.id, photo.user_id);

    Ok(CreatePhotoResponse {
        photo_id: photo.id,
        message: "Photo uploaded successfully".to_owned(),
    })
}

/// Replace title, caption and location. Only the owner may do this.
#[instrument(skip(store, request), fields(user_id = request.user_id), err(Debug))]
pub async fn update_photo(
    store: &dyn DataStore,
    photo_id: &str,
    request: &UpdatePhotoRequest,
) -> Result<MessageResponse, ApiError> {
    let photo = store
        .find_photo(photo_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;
    let allowed = store
        .find_user(request.user_id)
        .await?
        .is_some_and(|caller| can_update_photo(&caller, &photo));
    if !allowed {
        return Err(ApiError::forbidden("Unauthorized"));
    }

    store
        .update_photo(
            photo_id,
            &PhotoUpdate {
                title: request.title.trim().to_owned(),
                caption: trimmed(request.caption.as_deref()),
                location: trimmed(request.location.as_deref()),
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;

    Ok(MessageResponse::new("Photo updated successfully"))
}

/// Delete a photo with its comments and likes. Owner or admin only.
#[instrument(skip(store), err(Debug))]
pub async fn delete_photo(
    store: &dyn DataStore,
    photo_id: &str,
    caller_id: i32,
) -> Result<MessageResponse, ApiError> {
    let photo = store
        .find_photo(photo_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Photo not found"))?;
    let allowed = store
        .find_user(caller_id)
        .await?
        .is_some_and(|caller| can_delete_photo(&caller, &photo));
    if !allowed {
        return Err(ApiError::forbidden("Unauthorized"));
    }

    if !store.delete_photo(photo_id).await? {
        return Err(ApiError::not_found("Photo not found"));
    }
    info!("Photo {} deleted by user {}", photo_id, caller_id);

    Ok(MessageResponse::new("Photo deleted successfully"))
}
