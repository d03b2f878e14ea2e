//! Publisher port - abstraction over emitting a post to an external network.

use async_trait::async_trait;
use thiserror::Error;

/// Publish failures. The core does not differentiate beyond "failed with a
/// reason"; rate limits and transient network errors both land in `Failed`.
/// A richer taxonomy (and a retry policy built on it) is an extension
/// point, not a current requirement.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish failed: {0}")]
    Failed(String),

    #[error("publish timed out")]
    Timeout,
}

/// Publisher - an opaque, potentially slow, potentially failing capability.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Emit the given content to the external network.
    async fn publish(&self, content: &str) -> Result<(), PublishError>;
}
