//! Infrastructure - cold path only
//!
//! This module contains everything around the allocator:
//! - HTTP API
//! - Logging and metrics
//! - Configuration management

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;

pub use api::start_server;
