//! # Chirp Core
//!
//! The domain layer of the Chirp scheduled-post backend.
//! This crate contains the post lifecycle model, the dispatch scheduler,
//! the analytics engine, and the ports infrastructure must implement.

pub mod analytics;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod ports;

pub use error::DomainError;
