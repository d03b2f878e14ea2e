//! Publisher implementations.

mod log;

pub use log::LogPublisher;
