//! Content store port - the data-access boundary for posts.
//!
//! Every owner-facing query takes the verified `owner_id`; implementations
//! must never return a post to a caller whose owner differs. The dispatcher
//! side (`find_due`, `try_transition`) queries by state, not by caller id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, PostStatus};
use crate::error::RepoError;

/// Pagination parameters for listings.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.per_page
    }
}

/// Post repository - the content store contract.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Fetch a single post, scoped to its owner.
    async fn find_by_id(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Post>, RepoError>;

    /// List an owner's posts, newest scheduled time first. `page = None`
    /// returns the full set (used by the analytics engine).
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<PostStatus>,
        page: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepoError>;

    /// Count an owner's posts, optionally restricted to one status.
    async fn count_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<u64, RepoError>;

    /// Point-in-time snapshot of all scheduled posts whose scheduled time
    /// has elapsed. Posts created or edited after the snapshot is taken
    /// are picked up on a later call, never retroactively.
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError>;

    /// Atomic compare-and-set on the lifecycle state: apply
    /// `from -> to` (recording `posted_at` when given) only if the post's
    /// current status is still `from`. Returns whether the update applied;
    /// a `false` return is a no-op, not an error.
    async fn try_transition(
        &self,
        id: Uuid,
        from: PostStatus,
        to: PostStatus,
        posted_at: Option<DateTime<Utc>>,
    ) -> Result<bool, RepoError>;

    /// Write `content` and `scheduled_time` from `post`, applied only while
    /// the stored status is still `Scheduled`. Returns whether the update
    /// applied; losing the race against the dispatcher yields `false`.
    async fn update_if_scheduled(&self, post: &Post) -> Result<bool, RepoError>;

    /// Remove an owner's post. Callers are responsible for rejecting
    /// deletion of published posts before reaching the store.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), RepoError>;
}
