//! Post lifecycle handlers - create, read, update, cancel, delete.
//!
//! Every operation is scoped to the authenticated owner. State-changing
//! operations on a post that is no longer `Scheduled` answer 409; that
//! includes losing the race against a concurrent dispatch tick.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use chirp_core::domain::{Post, PostStatus};
use chirp_core::ports::PageRequest;
use chirp_shared::dto::{CreatePostRequest, PostListResponse, PostResponse, UpdatePostRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

fn parse_status_filter(raw: Option<&str>) -> AppResult<Option<PostStatus>> {
    match raw {
        None => Ok(None),
        Some(s) => PostStatus::parse(s)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown status filter '{s}'"))),
    }
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = Post::new(
        identity.user_id,
        req.content,
        req.scheduled_time,
        req.ai_generated,
    )?;
    let saved = state.posts.insert(post).await?;

    Ok(HttpResponse::Created().json(PostResponse::from(saved)))
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let status = parse_status_filter(query.status.as_deref())?;

    let page = PageRequest {
        page: query.page.unwrap_or(1).max(1),
        per_page: query.limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE),
    };

    let posts = state
        .posts
        .list_by_owner(identity.user_id, status, Some(page))
        .await?;
    let total = state.posts.count_by_owner(identity.user_id, status).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        total,
        total_pages: total.div_ceil(page.per_page),
        current_page: page.page,
    }))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id, identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(id, identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    if !post.is_editable() {
        return Err(AppError::Conflict(
            "Cannot edit a post that is no longer scheduled".to_string(),
        ));
    }

    if let Some(content) = req.content {
        Post::validate_content(&content)?;
        post.content = content;
    }
    if let Some(scheduled_time) = req.scheduled_time {
        post.scheduled_time = scheduled_time;
    }

    // Conditional write: the dispatcher may have picked the post up since
    // the read above; in that case nothing is changed.
    let applied = state.posts.update_if_scheduled(&post).await?;
    if !applied {
        return Err(AppError::Conflict(
            "Post was dispatched while editing".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// POST /api/posts/{id}/cancel
pub async fn cancel(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id, identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    let applied = state
        .posts
        .try_transition(post.id, PostStatus::Scheduled, PostStatus::Cancelled, None)
        .await?;
    if !applied {
        return Err(AppError::Conflict(
            "Post is no longer scheduled".to_string(),
        ));
    }

    let cancelled = state
        .posts
        .find_by_id(id, identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    Ok(HttpResponse::Ok().json(PostResponse::from(cancelled)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id, identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    if post.status == PostStatus::Posted {
        return Err(AppError::Conflict(
            "Cannot delete a published post".to_string(),
        ));
    }

    state.posts.delete(id, identity.user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
