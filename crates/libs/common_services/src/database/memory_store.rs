use crate::database::app_user::{NewUser, User, UserRole};
use crate::database::comment::{Comment, CommentWithAuthor};
use crate::database::photo::{LikeToggle, NewPhoto, Photo, PhotoUpdate, PhotoWithCreator};
use crate::database::{DataStore, DbError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// In-process [`DataStore`], used by tests and local runs without Postgres.
///
/// One mutex guards all state, so every operation (including `toggle_like`) is atomic.
/// After [`DataStore::close`] every call fails with a connection error.
#[derive(Default)]
pub struct MemoryDataStore {
    state: Mutex<MemoryState>,
    closed: AtomicBool,
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    photos: Vec<Photo>,
    comments: Vec<Comment>,
    likes: HashSet<(String, i32)>,
    next_user_id: i32,
    next_comment_id: i64,
}

impl MemoryState {
    fn user(&self, user_id: i32) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    fn with_creator(&self, photo: &Photo) -> PhotoWithCreator {
        let creator = self.user(photo.user_id);
        PhotoWithCreator {
            photo: photo.clone(),
            creator_name: creator.map(|u| u.display_name.clone()).unwrap_or_default(),
            creator_picture: creator.and_then(|u| u.picture_url.clone()),
        }
    }

    /// Published photos matching `search`, newest first.
    fn published(&self, search: Option<&str>) -> Vec<&Photo> {
        let term = search.map(str::to_lowercase);
        let contains = |field: Option<&str>, term: &str| {
            field.is_some_and(|f| f.to_lowercase().contains(term))
        };
        let mut photos: Vec<&Photo> = self
            .photos
            .iter()
            .rev()
            .filter(|p| p.is_published)
            .filter(|p| {
                term.as_deref().is_none_or(|t| {
                    contains(Some(&p.title), t)
                        || contains(p.caption.as_deref(), t)
                        || contains(p.location.as_deref(), t)
                })
            })
            .collect();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        photos
    }
}

fn missing_reference(what: &str) -> DbError {
    DbError::Sqlx(sqlx::Error::Protocol(format!(
        "foreign key violation: {what} does not exist"
    )))
}

impl MemoryDataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check_open(&self) -> Result<(), DbError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DbError::Connection(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    /// Reopen a store after [`DataStore::close`], keeping its data.
    pub fn reopen(&self) {
        self.closed.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn ping(&self) -> Result<(), DbError> {
        self.check_open()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    async fn find_user(&self, user_id: i32) -> Result<Option<User>, DbError> {
        self.check_open()?;
        Ok(self.state.lock().await.user(user_id).cloned())
    }

    async fn upsert_user(&self, new_user: &NewUser) -> Result<User, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        let now = Utc::now();
        if let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.identity_provider_id == new_user.identity_provider_id)
        {
            user.email.clone_from(&new_user.email);
            user.display_name.clone_from(&new_user.display_name);
            user.picture_url.clone_from(&new_user.picture_url);
            user.updated_at = now;
            return Ok(user.clone());
        }

        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            identity_provider_id: new_user.identity_provider_id.clone(),
            email: new_user.email.clone(),
            display_name: new_user.display_name.clone(),
            picture_url: new_user.picture_url.clone(),
            role: UserRole::Consumer,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn set_user_role(&self, user_id: i32, role: UserRole) -> Result<Option<User>, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        Ok(state.users.iter_mut().find(|u| u.id == user_id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn list_published_photos(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PhotoWithCreator>, DbError> {
        self.check_open()?;
        let state = self.state.lock().await;
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .published(search)
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|p| state.with_creator(p))
            .collect())
    }

    async fn count_published_photos(&self, search: Option<&str>) -> Result<i64, DbError> {
        self.check_open()?;
        let state = self.state.lock().await;
        Ok(i64::try_from(state.published(search).len()).unwrap_or(i64::MAX))
    }

    async fn find_photo(&self, photo_id: &str) -> Result<Option<Photo>, DbError> {
        self.check_open()?;
        let state = self.state.lock().await;
        Ok(state.photos.iter().find(|p| p.id == photo_id).cloned())
    }

    async fn find_published_photo(
        &self,
        photo_id: &str,
    ) -> Result<Option<PhotoWithCreator>, DbError> {
        self.check_open()?;
        let state = self.state.lock().await;
        Ok(state
            .photos
            .iter()
            .find(|p| p.id == photo_id && p.is_published)
            .map(|p| state.with_creator(p)))
    }

    async fn increment_view_count(&self, photo_id: &str) -> Result<bool, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        Ok(state
            .photos
            .iter_mut()
            .find(|p| p.id == photo_id && p.is_published)
            .map(|p| p.view_count += 1)
            .is_some())
    }

    async fn create_photo(&self, new_photo: &NewPhoto) -> Result<Photo, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        if state.user(new_photo.user_id).is_none() {
            return Err(missing_reference("user"));
        }
        if state.photos.iter().any(|p| p.id == new_photo.id) {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(format!(
                "duplicate photo id {}",
                new_photo.id
            ))));
        }
        let now = Utc::now();
        let photo = Photo {
            id: new_photo.id.clone(),
            user_id: new_photo.user_id,
            title: new_photo.title.clone(),
            caption: new_photo.caption.clone(),
            location: new_photo.location.clone(),
            image_url: new_photo.image_url.clone(),
            thumbnail_url: new_photo.thumbnail_url.clone(),
            view_count: 0,
            like_count: 0,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        state.photos.push(photo.clone());
        Ok(photo)
    }

    async fn update_photo(
        &self,
        photo_id: &str,
        update: &PhotoUpdate,
    ) -> Result<Option<Photo>, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        Ok(state
            .photos
            .iter_mut()
            .find(|p| p.id == photo_id)
            .map(|photo| {
                photo.title.clone_from(&update.title);
                photo.caption.clone_from(&update.caption);
                photo.location.clone_from(&update.location);
                photo.updated_at = Utc::now();
                photo.clone()
            }))
    }

    async fn delete_photo(&self, photo_id: &str) -> Result<bool, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        let before = state.photos.len();
        state.photos.retain(|p| p.id != photo_id);
        if state.photos.len() == before {
            return Ok(false);
        }
        state.comments.retain(|c| c.photo_id != photo_id);
        state.likes.retain(|(liked_photo, _)| liked_photo != photo_id);
        Ok(true)
    }

    async fn toggle_like(
        &self,
        photo_id: &str,
        user_id: i32,
    ) -> Result<Option<LikeToggle>, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        if !state.photos.iter().any(|p| p.id == photo_id) {
            return Ok(None);
        }
        let key = (photo_id.to_owned(), user_id);
        let liked = if state.likes.remove(&key) {
            false
        } else {
            state.likes.insert(key);
            true
        };
        let Some(photo) = state.photos.iter_mut().find(|p| p.id == photo_id) else {
            return Ok(None);
        };
        photo.like_count += if liked { 1 } else { -1 };
        Ok(Some(LikeToggle {
            liked,
            like_count: photo.like_count,
        }))
    }

    async fn list_comments(&self, photo_id: &str) -> Result<Vec<CommentWithAuthor>, DbError> {
        self.check_open()?;
        let state = self.state.lock().await;
        let mut comments: Vec<&Comment> = state
            .comments
            .iter()
            .rev()
            .filter(|c| c.photo_id == photo_id)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments
            .into_iter()
            .map(|c| {
                let author = state.user(c.user_id);
                CommentWithAuthor {
                    comment: c.clone(),
                    user_name: author.map(|u| u.display_name.clone()).unwrap_or_default(),
                    user_picture: author.and_then(|u| u.picture_url.clone()),
                }
            })
            .collect())
    }

    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>, DbError> {
        self.check_open()?;
        let state = self.state.lock().await;
        Ok(state.comments.iter().find(|c| c.id == comment_id).cloned())
    }

    async fn create_comment(
        &self,
        photo_id: &str,
        user_id: i32,
        text: &str,
    ) -> Result<Comment, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        if !state.photos.iter().any(|p| p.id == photo_id) {
            return Err(missing_reference("photo"));
        }
        if state.user(user_id).is_none() {
            return Err(missing_reference("user"));
        }
        state.next_comment_id += 1;
        let comment = Comment {
            id: state.next_comment_id,
            photo_id: photo_id.to_owned(),
            user_id,
            text: text.to_owned(),
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool, DbError> {
        self.check_open()?;
        let mut state = self.state.lock().await;
        let before = state.comments.len();
        state.comments.retain(|c| c.id != comment_id);
        Ok(state.comments.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::Result;
    use std::sync::Arc;

    fn new_user(sub: &str, name: &str) -> NewUser {
        NewUser {
            identity_provider_id: sub.to_owned(),
            email: format!("{sub}@example.com"),
            display_name: name.to_owned(),
            picture_url: None,
        }
    }

    fn new_photo(id: &str, user_id: i32, title: &str) -> NewPhoto {
        NewPhoto {
            id: id.to_owned(),
            user_id,
            title: title.to_owned(),
            caption: None,
            location: None,
            image_url: format!("https://cdn.example.com/{id}.jpg"),
            thumbnail_url: None,
        }
    }

    #[tokio::test]
    async fn upsert_keeps_id_and_role() -> Result<()> {
        let store = MemoryDataStore::new();
        let first = store.upsert_user(&new_user("g-1", "Ann")).await?;
        store.set_user_role(first.id, UserRole::Creator).await?;

        let second = store.upsert_user(&new_user("g-1", "Ann B")).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(second.display_name, "Ann B");
        assert_eq!(second.role, UserRole::Creator);
        Ok(())
    }

    #[tokio::test]
    async fn search_and_order() -> Result<()> {
        let store = MemoryDataStore::new();
        let user = store.upsert_user(&new_user("g-1", "Ann")).await?;
        store.create_photo(&new_photo("a", user.id, "Beach day")).await?;
        store.create_photo(&new_photo("b", user.id, "Mountain")).await?;
        store.create_photo(&new_photo("c", user.id, "BEACH night")).await?;

        let all = store.list_published_photos(None, 10, 0).await?;
        let ids: Vec<_> = all.iter().map(|p| p.photo.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);

        let beach = store.list_published_photos(Some("beach"), 10, 0).await?;
        assert_eq!(beach.len(), 2);
        assert_eq!(store.count_published_photos(Some("beach")).await?, 2);
        assert_eq!(store.count_published_photos(Some("%")).await?, 0);

        let page = store.list_published_photos(None, 1, 1).await?;
        assert_eq!(page[0].photo.id, "b");
        Ok(())
    }

    #[tokio::test]
    async fn delete_photo_cascades() -> Result<()> {
        let store = MemoryDataStore::new();
        let user = store.upsert_user(&new_user("g-1", "Ann")).await?;
        store.create_photo(&new_photo("a", user.id, "Beach")).await?;
        let comment = store.create_comment("a", user.id, "nice").await?;
        store.toggle_like("a", user.id).await?;

        assert!(store.delete_photo("a").await?);
        assert!(store.find_comment(comment.id).await?.is_none());
        assert!(!store.delete_photo("a").await?);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_toggles_keep_count_consistent() -> Result<()> {
        let store = Arc::new(MemoryDataStore::new());
        let owner = store.upsert_user(&new_user("owner", "Owner")).await?;
        store.create_photo(&new_photo("a", owner.id, "Beach")).await?;

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            let user = store.upsert_user(&new_user(&format!("u{i}"), "U")).await?;
            handles.push(tokio::spawn(async move {
                store.toggle_like("a", user.id).await
            }));
        }
        for handle in handles {
            handle.await??;
        }

        let photo = store.find_photo("a").await?.map(|p| p.like_count);
        assert_eq!(photo, Some(20));
        Ok(())
    }

    #[tokio::test]
    async fn same_user_racing_toggles_settle_on_parity() -> Result<()> {
        let store = Arc::new(MemoryDataStore::new());
        let owner = store.upsert_user(&new_user("owner", "Owner")).await?;
        let user = store.upsert_user(&new_user("u", "U")).await?.id;
        store.create_photo(&new_photo("a", owner.id, "Beach")).await?;

        let mut handles = Vec::new();
        for _ in 0..11 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.toggle_like("a", user).await }));
        }
        for handle in handles {
            handle.await??;
        }

        let photo = store.find_photo("a").await?.map(|p| p.like_count);
        assert_eq!(photo, Some(1));
        let undone = store.toggle_like("a", user).await?;
        assert_eq!(undone, Some(LikeToggle { liked: false, like_count: 0 }));
        Ok(())
    }

    #[tokio::test]
    async fn closed_store_reports_connection_errors() {
        let store = MemoryDataStore::new();
        store.close().await;
        let err = store.ping().await.err();
        assert!(err.is_some_and(|e| e.is_transient()));
        store.reopen();
        assert!(store.ping().await.is_ok());
    }
}
