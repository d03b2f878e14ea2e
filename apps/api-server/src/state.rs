//! Application state - shared across all handlers.

use std::sync::Arc;

use chirp_core::analytics::AnalyticsEngine;
use chirp_core::dispatch::{DispatchConfig, Dispatcher};
use chirp_core::ports::{Clock, PostRepository, Publisher, SystemClock};
use chirp_infra::database::InMemoryPostRepository;
use chirp_infra::publisher::LogPublisher;

#[cfg(feature = "postgres")]
use chirp_infra::database::{DatabaseConnections, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub dispatcher: Arc<Dispatcher>,
    pub analytics: Arc<AnalyticsEngine>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let posts: Arc<dyn PostRepository> = {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => Arc::new(PostgresPostRepository::new(connections.main)),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        Arc::new(InMemoryPostRepository::new())
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Arc::new(InMemoryPostRepository::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let posts: Arc<dyn PostRepository> = {
            tracing::info!("Running without postgres feature - using in-memory repository");
            Arc::new(InMemoryPostRepository::new())
        };

        let publisher: Arc<dyn Publisher> = Arc::new(LogPublisher::from_env());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let dispatcher = Arc::new(Dispatcher::new(
            posts.clone(),
            publisher,
            DispatchConfig {
                publish_timeout: config.dispatch.publish_timeout,
            },
        ));
        let analytics = Arc::new(AnalyticsEngine::new(posts.clone()));

        tracing::info!("Application state initialized");

        Self {
            posts,
            dispatcher,
            analytics,
            clock,
        }
    }
}
