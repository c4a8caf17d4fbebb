//! Execution service
//!
//! Connects snapshot storage (cold path) to the allocator and records the
//! outcome. Each request gets its own snapshot copy, so concurrent requests
//! never share mutable balances.

use crate::core::{FixedPoint8, Side};
use crate::hot_path::{self, FillPlan};
use crate::infrastructure::metrics::MetricsCollector;
use crate::snapshots::SnapshotSource;
use crate::{MetaError, Result};
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of one plan request
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub plan_id: Uuid,
    pub side: Side,
    pub requested: FixedPoint8,
    pub plan: FillPlan,
}

impl ExecutionReport {
    /// True when the plan covers less than requested
    pub fn is_partial(&self) -> bool {
        !self.plan.is_complete(self.requested)
    }
}

/// Computes best-execution plans against the current snapshots
#[derive(Clone)]
pub struct ExecutionService {
    source: Arc<dyn SnapshotSource>,
    metrics: Arc<MetricsCollector>,
}

impl ExecutionService {
    /// Create a service over a snapshot source and shared metrics
    pub fn new(source: Arc<dyn SnapshotSource>, metrics: Arc<MetricsCollector>) -> Self {
        Self { source, metrics }
    }

    /// Get metrics collector reference
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Build a plan for `amount` on `side`
    ///
    /// The request is validated before storage is touched. Blocking: loads
    /// snapshots synchronously, call from `spawn_blocking` in async code.
    pub fn plan(&self, side: &str, amount: FixedPoint8) -> Result<ExecutionReport> {
        let side = hot_path::validate_request(side, amount).map_err(|e| {
            self.metrics.record_rejected();
            MetaError::from(e)
        })?;

        let mut venues = self.source.load().map_err(|e| {
            self.metrics.record_snapshot_failure();
            tracing::error!(target: "engine", "Failed to load snapshots from {}: {}", self.source.describe(), e);
            MetaError::from(e)
        })?;

        let plan = hot_path::allocate(&mut venues, side, amount)?;
        let report = ExecutionReport {
            plan_id: Uuid::new_v4(),
            side,
            requested: amount,
            plan,
        };

        self.metrics.record_plan(report.plan.len(), report.is_partial());
        if report.is_partial() {
            tracing::warn!(
                target: "engine",
                plan_id = %report.plan_id,
                "Partial fill: {} {} requested, {} available across {} venues",
                side,
                amount,
                report.plan.filled_quantity(),
                venues.len()
            );
        } else {
            tracing::info!(
                target: "engine",
                plan_id = %report.plan_id,
                "Planned {} {} in {} fills, total {}",
                side,
                amount,
                report.plan.len(),
                report.plan.total
            );
        }

        Ok(report)
    }
}
