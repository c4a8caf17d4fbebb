//! Best-execution routing across multiple crypto exchanges
//!
//! Core library for splitting one BTC/EUR order across venue order books
//! while respecting per-venue balances.

pub mod core;
pub mod engine;
pub mod hot_path;
pub mod infrastructure;
pub mod snapshots;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use engine::{ExecutionReport, ExecutionService};
pub use infrastructure::config::{ApiConfig, Config};

use thiserror::Error;

use crate::hot_path::AllocationError;
use crate::infrastructure::config::ConfigError;
use crate::snapshots::SnapshotError;

/// Main error type for the execution service
#[derive(Error, Debug)]
pub enum MetaError {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MetaError>;
