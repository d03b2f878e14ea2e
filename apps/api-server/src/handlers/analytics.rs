//! Aggregation view handlers.
//!
//! Read-only; every view is computed as of now, strictly over the
//! authenticated owner's posts. A store failure surfaces as a server
//! error - no partial or cached result is substituted.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use chirp_core::analytics::{DEFAULT_TOP_LIMIT, TrendWindow};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopPostsQuery {
    pub limit: Option<usize>,
}

/// GET /api/analytics/overview
pub async fn overview(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let view = state.analytics.overview(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/analytics/trends?period=7d|30d|90d
pub async fn trends(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<TrendsQuery>,
) -> AppResult<HttpResponse> {
    // Unrecognized periods fall back to the 7-day default.
    let window = TrendWindow::parse(query.period.as_deref().unwrap_or("7d"));

    let series = state
        .analytics
        .trend(identity.user_id, window, state.clock.now())
        .await?;

    Ok(HttpResponse::Ok().json(series))
}

/// GET /api/analytics/top-posts?limit=N
pub async fn top_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<TopPostsQuery>,
) -> AppResult<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);

    let ranking = state.analytics.top_posts(identity.user_id, limit).await?;

    Ok(HttpResponse::Ok().json(ranking))
}

/// GET /api/analytics/schedule
pub async fn schedule(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = state.analytics.hourly_profile(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
