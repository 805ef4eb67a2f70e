//! HTTP API: configuration, routing, and request/response mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;

pub use app::{AppServices, build_app, build_in_memory_app};
pub use config::{AppConfig, ConfigError};
