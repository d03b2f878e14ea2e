use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum post length, counted in characters.
pub const MAX_CONTENT_CHARS: usize = 280;

/// Lifecycle state of a post.
///
/// `Scheduled` is the only state the dispatcher acts on; the other three
/// are terminal. `Posted`/`Failed` are reached through the dispatcher's
/// conditional transition, `Cancelled` through an owner action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Scheduled,
    Posted,
    Failed,
    Cancelled,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Scheduled => "scheduled",
            PostStatus::Posted => "posted",
            PostStatus::Failed => "failed",
            PostStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status from its wire form. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(PostStatus::Scheduled),
            "posted" => Some(PostStatus::Posted),
            "failed" => Some(PostStatus::Failed),
            "cancelled" => Some(PostStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether the dispatcher will never touch this state again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PostStatus::Scheduled)
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-post engagement counters, written by an external metrics
/// collaborator once the post is published. All zero at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub impressions: u64,
}

impl Engagement {
    /// Sum of the directly interactive counters (everything but impressions).
    pub fn interactions(&self) -> u64 {
        self.likes + self.retweets + self.replies
    }

    /// Accumulate another set of counters into this one.
    pub fn add(&mut self, other: &Engagement) {
        self.likes += other.likes;
        self.retweets += other.retweets;
        self.replies += other.replies;
        self.impressions += other.impressions;
    }
}

/// Post entity - a schedulable unit of content with lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub scheduled_time: DateTime<Utc>,
    pub status: PostStatus,
    pub ai_generated: bool,
    pub engagement: Engagement,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, when `status` transitions to `Posted`.
    pub posted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new scheduled post with generated ID and timestamps.
    pub fn new(
        owner_id: Uuid,
        content: String,
        scheduled_time: DateTime<Utc>,
        ai_generated: bool,
    ) -> Result<Self, DomainError> {
        Self::validate_content(&content)?;

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            content,
            scheduled_time,
            status: PostStatus::Scheduled,
            ai_generated,
            engagement: Engagement::default(),
            created_at: Utc::now(),
            posted_at: None,
        })
    }

    /// Content must be 1-280 characters inclusive.
    pub fn validate_content(content: &str) -> Result<(), DomainError> {
        let chars = content.chars().count();
        if chars == 0 {
            return Err(DomainError::Validation(
                "Post content must not be empty".to_string(),
            ));
        }
        if chars > MAX_CONTENT_CHARS {
            return Err(DomainError::Validation(format!(
                "Post content must be at most {MAX_CONTENT_CHARS} characters (got {chars})"
            )));
        }
        Ok(())
    }

    /// Content and scheduled time are mutable only while still scheduled.
    pub fn is_editable(&self) -> bool {
        self.status == PostStatus::Scheduled
    }

    /// Whether the dispatcher would select this post at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Scheduled && self.scheduled_time <= now
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn new_post_starts_scheduled_with_zero_engagement() {
        let owner = Uuid::new_v4();
        let when = Utc::now() + TimeDelta::hours(2);
        let post = Post::new(owner, "hello world".to_string(), when, false).unwrap();

        assert_eq!(post.status, PostStatus::Scheduled);
        assert_eq!(post.engagement, Engagement::default());
        assert!(post.posted_at.is_none());
        assert_eq!(post.owner_id, owner);
        assert!(post.is_editable());
    }

    #[test]
    fn content_length_bounds() {
        let owner = Uuid::new_v4();
        let when = Utc::now();

        assert!(Post::new(owner, String::new(), when, false).is_err());
        assert!(Post::new(owner, "a".repeat(280), when, false).is_ok());
        assert!(Post::new(owner, "a".repeat(281), when, false).is_err());
    }

    #[test]
    fn content_length_counts_characters_not_bytes() {
        // 280 multibyte characters are within bounds even though the byte
        // length is far past 280.
        let content = "é".repeat(280);
        assert!(content.len() > 280);
        assert!(Post::validate_content(&content).is_ok());
    }

    #[test]
    fn due_only_while_scheduled_and_elapsed() {
        let now = Utc::now();
        let mut post = Post::new(
            Uuid::new_v4(),
            "hello".to_string(),
            now - TimeDelta::seconds(1),
            false,
        )
        .unwrap();

        assert!(post.is_due(now));

        post.scheduled_time = now + TimeDelta::hours(1);
        assert!(!post.is_due(now));

        post.scheduled_time = now - TimeDelta::seconds(1);
        post.status = PostStatus::Cancelled;
        assert!(!post.is_due(now));
    }

    #[test]
    fn status_round_trips_through_wire_form() {
        for status in [
            PostStatus::Scheduled,
            PostStatus::Posted,
            PostStatus::Failed,
            PostStatus::Cancelled,
        ] {
            assert_eq!(PostStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PostStatus::parse("draft"), None);
    }
}
