//! Operator-facing dispatch trigger.
//!
//! Normally the background loop drives ticks; this endpoint lets test
//! harnesses and operators run one deterministically, optionally with an
//! injected `now`.

use actix_web::{HttpResponse, web};

use chirp_shared::dto::TickRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/dispatch/tick
pub async fn tick(
    state: web::Data<AppState>,
    _identity: Identity,
    body: Option<web::Json<TickRequest>>,
) -> AppResult<HttpResponse> {
    let now = body
        .and_then(|b| b.into_inner().now)
        .unwrap_or_else(|| state.clock.now());

    let summary = state.dispatcher.tick(now).await?;

    tracing::info!(
        due = summary.due,
        published = summary.published,
        failed = summary.failed,
        skipped = summary.skipped,
        "Manual dispatch tick complete"
    );

    Ok(HttpResponse::Ok().json(summary))
}
