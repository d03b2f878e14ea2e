//! In-memory content store - used as fallback when Postgres is unavailable
//! and as the deterministic store in tests.
//!
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use chirp_core::domain::{Post, PostStatus};
use chirp_core::error::RepoError;
use chirp_core::ports::{PageRequest, PostRepository};

/// In-memory post repository using a HashMap with an async RwLock.
///
/// The conditional writes (`try_transition`, `update_if_scheduled`) check
/// and mutate under a single write-lock acquisition, which gives the same
/// one-winner guarantee the filtered SQL `UPDATE` provides.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, new_post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&new_post.id) {
            return Err(RepoError::Constraint("Post already exists".to_string()));
        }
        store.insert(new_post.id, new_post.clone());
        Ok(new_post)
    }

    async fn find_by_id(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .get(&id)
            .filter(|post| post.owner_id == owner_id)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<PostStatus>,
        page: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .values()
            .filter(|post| post.owner_id == owner_id)
            .filter(|post| status.is_none_or(|s| post.status == s))
            .cloned()
            .collect();

        posts.sort_by(|a, b| b.scheduled_time.cmp(&a.scheduled_time));

        if let Some(page) = page {
            posts = posts
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.per_page as usize)
                .collect();
        }

        Ok(posts)
    }

    async fn count_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|post| post.owner_id == owner_id)
            .filter(|post| status.is_none_or(|s| post.status == s))
            .count() as u64)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut due: Vec<Post> = store
            .values()
            .filter(|post| post.is_due(now))
            .cloned()
            .collect();

        due.sort_by(|a, b| a.scheduled_time.cmp(&b.scheduled_time));
        Ok(due)
    }

    async fn try_transition(
        &self,
        id: Uuid,
        from: PostStatus,
        to: PostStatus,
        posted_at: Option<DateTime<Utc>>,
    ) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&id) {
            Some(post) if post.status == from => {
                post.status = to;
                post.posted_at = posted_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_if_scheduled(&self, updated: &Post) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&updated.id) {
            Some(post)
                if post.owner_id == updated.owner_id && post.status == PostStatus::Scheduled =>
            {
                post.content = updated.content.clone();
                post.scheduled_time = updated.scheduled_time;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        match store.get(&id) {
            Some(post) if post.owner_id == owner_id => {
                store.remove(&id);
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }
}
