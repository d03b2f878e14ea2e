//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use chirp_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub dispatch: DispatchSettings,
}

/// Dispatch loop settings.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Enable the recurring dispatch loop.
    pub enabled: bool,
    /// Wall-clock interval between ticks.
    pub tick_interval: Duration,
    /// Per-item publish timeout within a tick.
    pub publish_timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval: Duration::from_secs(60),
            publish_timeout: Duration::from_secs(30),
        }
    }
}

impl DispatchSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::var("DISPATCH_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            tick_interval: env::var("DISPATCH_INTERVAL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.tick_interval),
            publish_timeout: env::var("PUBLISH_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.publish_timeout),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            dispatch: DispatchSettings::from_env(),
        }
    }
}
