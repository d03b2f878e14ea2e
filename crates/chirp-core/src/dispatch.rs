//! Dispatch scheduler - scans for due posts and drives each through the
//! posting state machine.
//!
//! One `tick(now)` snapshots the due set, attempts publication per item,
//! and records the outcome with a conditional transition out of
//! `Scheduled`. The conditional update is what makes overlapping ticks and
//! racing owner edits safe: the loser's write is a provable no-op.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Post, PostStatus};
use crate::error::RepoError;
use crate::ports::{PostRepository, PublishError, Publisher};

/// Dispatcher tuning knobs.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound on a single publish attempt; no response within this
    /// window is treated as a publish failure.
    pub publish_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            publish_timeout: Duration::from_secs(30),
        }
    }
}

/// Counts from one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// Posts selected by the due-item snapshot.
    pub due: usize,
    /// Transitioned to `Posted`.
    pub published: usize,
    /// Transitioned to `Failed`.
    pub failed: usize,
    /// Lost the transition race or hit a per-item store error; left for a
    /// later tick or another actor.
    pub skipped: usize,
}

enum ItemOutcome {
    Published,
    Failed,
    Skipped,
}

/// The dispatch scheduler.
pub struct Dispatcher {
    posts: Arc<dyn PostRepository>,
    publisher: Arc<dyn Publisher>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        publisher: Arc<dyn Publisher>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            posts,
            publisher,
            config,
        }
    }

    /// Run one due-item scan-and-publish cycle at the given instant.
    ///
    /// A store error on the snapshot query abandons the whole tick (the
    /// caller logs it; due items are re-discovered next tick). Per-item
    /// errors never abort the remaining items.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<TickSummary, RepoError> {
        let due = self.posts.find_due(now).await?;

        let mut summary = TickSummary {
            due: due.len(),
            ..TickSummary::default()
        };

        if !due.is_empty() {
            tracing::info!(count = due.len(), %now, "Processing due posts");
        }

        for post in due {
            let post_id = post.id;
            match self.process_item(post, now).await {
                Ok(ItemOutcome::Published) => summary.published += 1,
                Ok(ItemOutcome::Failed) => summary.failed += 1,
                Ok(ItemOutcome::Skipped) => summary.skipped += 1,
                Err(err) => {
                    tracing::error!(%post_id, error = %err, "Store error while recording outcome");
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    async fn process_item(&self, post: Post, now: DateTime<Utc>) -> Result<ItemOutcome, RepoError> {
        let publish_result =
            match tokio::time::timeout(self.config.publish_timeout, self.publisher.publish(&post.content))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(PublishError::Timeout),
            };

        match publish_result {
            Ok(()) => {
                let applied = self
                    .posts
                    .try_transition(post.id, PostStatus::Scheduled, PostStatus::Posted, Some(now))
                    .await?;

                if applied {
                    tracing::info!(post_id = %post.id, "Post published");
                    Ok(ItemOutcome::Published)
                } else {
                    tracing::debug!(post_id = %post.id, "Lost transition race, leaving untouched");
                    Ok(ItemOutcome::Skipped)
                }
            }
            Err(err) => {
                tracing::warn!(post_id = %post.id, error = %err, "Publish attempt failed");

                let applied = self
                    .posts
                    .try_transition(post.id, PostStatus::Scheduled, PostStatus::Failed, None)
                    .await?;

                Ok(if applied {
                    ItemOutcome::Failed
                } else {
                    ItemOutcome::Skipped
                })
            }
        }
    }
}
