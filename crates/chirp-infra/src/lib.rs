//! # Chirp Infrastructure
//!
//! Concrete implementations of the ports defined in `chirp-core`.
//! This crate contains the content store adapters, the token service, and
//! the simulated publisher.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `auth` - JWT bearer-token validation

pub mod database;
pub mod publisher;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::InMemoryPostRepository;
pub use publisher::LogPublisher;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresPostRepository};

#[cfg(feature = "auth")]
pub use auth::JwtTokenService;
