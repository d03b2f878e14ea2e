//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use chirp_core::domain::{Engagement, Post, PostStatus};
use chirp_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub scheduled_time: DateTimeUtc,
    pub status: String,
    pub ai_generated: bool,
    pub likes: i64,
    pub retweets: i64,
    pub replies: i64,
    pub impressions: i64,
    pub created_at: DateTimeUtc,
    pub posted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Conversion from SeaORM Model to the domain Post. Fails on a status
    /// string the domain does not know.
    pub fn into_domain(self) -> Result<Post, RepoError> {
        let status = PostStatus::parse(&self.status)
            .ok_or_else(|| RepoError::Query(format!("unknown post status '{}'", self.status)))?;

        Ok(Post {
            id: self.id,
            owner_id: self.owner_id,
            content: self.content,
            scheduled_time: self.scheduled_time,
            status,
            ai_generated: self.ai_generated,
            engagement: Engagement {
                likes: self.likes as u64,
                retweets: self.retweets as u64,
                replies: self.replies as u64,
                impressions: self.impressions as u64,
            },
            created_at: self.created_at,
            posted_at: self.posted_at,
        })
    }
}

/// Conversion from the domain Post to a SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            owner_id: Set(post.owner_id),
            content: Set(post.content),
            scheduled_time: Set(post.scheduled_time),
            status: Set(post.status.as_str().to_string()),
            ai_generated: Set(post.ai_generated),
            likes: Set(post.engagement.likes as i64),
            retweets: Set(post.engagement.retweets as i64),
            replies: Set(post.engagement.replies as i64),
            impressions: Set(post.engagement.impressions as i64),
            created_at: Set(post.created_at),
            posted_at: Set(post.posted_at),
        }
    }
}
