//! PostgreSQL content store.
//!
//! The lifecycle transitions (`try_transition`, `update_if_scheduled`) are
//! filtered `UPDATE`s checked via `rows_affected`, which is what makes them
//! atomic compare-and-set operations at the database level.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use chirp_core::domain::{Post, PostStatus};
use chirp_core::error::RepoError;
use chirp_core::ports::{PageRequest, PostRepository};

use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, new_post: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = new_post.into();
        let model = active.insert(&self.db).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                RepoError::Constraint("Post already exists".to_string())
            } else {
                RepoError::Query(err_str)
            }
        })?;

        model.into_domain()
    }

    async fn find_by_id(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(post::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        result.map(post::Model::into_domain).transpose()
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<PostStatus>,
        page: Option<PageRequest>,
    ) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find()
            .filter(post::Column::OwnerId.eq(owner_id))
            .order_by_desc(post::Column::ScheduledTime);

        if let Some(status) = status {
            query = query.filter(post::Column::Status.eq(status.as_str()));
        }
        if let Some(page) = page {
            query = query.offset(page.offset()).limit(page.per_page);
        }

        let models = query.all(&self.db).await.map_err(query_err)?;
        models.into_iter().map(post::Model::into_domain).collect()
    }

    async fn count_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<u64, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::OwnerId.eq(owner_id));

        if let Some(status) = status {
            query = query.filter(post::Column::Status.eq(status.as_str()));
        }

        query.count(&self.db).await.map_err(query_err)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::Status.eq(PostStatus::Scheduled.as_str()))
            .filter(post::Column::ScheduledTime.lte(now))
            .order_by_asc(post::Column::ScheduledTime)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        models.into_iter().map(post::Model::into_domain).collect()
    }

    async fn try_transition(
        &self,
        id: Uuid,
        from: PostStatus,
        to: PostStatus,
        posted_at: Option<DateTime<Utc>>,
    ) -> Result<bool, RepoError> {
        let mut update = PostEntity::update_many()
            .col_expr(post::Column::Status, Expr::value(to.as_str()))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::Status.eq(from.as_str()));

        if let Some(at) = posted_at {
            update = update.col_expr(post::Column::PostedAt, Expr::value(at));
        }

        let result = update.exec(&self.db).await.map_err(query_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn update_if_scheduled(&self, updated: &Post) -> Result<bool, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Content, Expr::value(updated.content.clone()))
            .col_expr(
                post::Column::ScheduledTime,
                Expr::value(updated.scheduled_time),
            )
            .filter(post::Column::Id.eq(updated.id))
            .filter(post::Column::OwnerId.eq(updated.owner_id))
            .filter(post::Column::Status.eq(PostStatus::Scheduled.as_str()))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
