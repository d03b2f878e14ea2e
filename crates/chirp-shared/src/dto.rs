//! Data Transfer Objects - request/response types for the API.
//!
//! Aggregation views (overview, trend, top posts, hourly profile) already
//! have explicit serializable shapes in `chirp_core::analytics` and are
//! returned as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chirp_core::domain::{Engagement, Post};

/// Request to schedule a new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub ai_generated: bool,
}

/// Request to edit a post that is still scheduled. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

/// A post as returned to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub content: String,
    pub scheduled_time: DateTime<Utc>,
    pub status: String,
    pub ai_generated: bool,
    pub engagement: Engagement,
    pub created_at: DateTime<Utc>,
    pub posted_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            content: post.content,
            scheduled_time: post.scheduled_time,
            status: post.status.as_str().to_string(),
            ai_generated: post.ai_generated,
            engagement: post.engagement,
            created_at: post.created_at,
            posted_at: post.posted_at,
        }
    }
}

/// Paginated listing of an owner's posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Operator/test-harness tick trigger. `now` overrides the server clock
/// for deterministic dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickRequest {
    pub now: Option<DateTime<Utc>>,
}
