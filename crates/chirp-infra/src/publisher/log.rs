//! Simulated publisher - stands in for the real social-network adapter.
//!
//! Emitting a post is logged instead of sent over the wire. An env switch
//! turns every attempt into a failure so the failed-post path can be
//! exercised end to end.

use async_trait::async_trait;

use chirp_core::ports::{PublishError, Publisher};

/// Publisher that logs emissions instead of delivering them.
pub struct LogPublisher {
    simulate_failure: bool,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn from_env() -> Self {
        Self {
            simulate_failure: std::env::var("PUBLISHER_SIMULATE_FAILURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

impl Default for LogPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, content: &str) -> Result<(), PublishError> {
        if self.simulate_failure {
            return Err(PublishError::Failed("simulated outage".to_string()));
        }

        tracing::info!(chars = content.chars().count(), "Posting: {content}");
        Ok(())
    }
}
