//! Metrics collection for the execution service
//!
//! Lock-free counters using atomic operations.
//! Updated per request, exported via API.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

/// Execution metrics collector
///
/// Thread-safe counters shared by every request handler.
/// Snapshots taken for API export.
pub struct MetricsCollector {
    /// Plans returned to callers (full or partial)
    plans_served: AtomicU64,
    /// Plans that covered less than the requested amount
    partial_plans: AtomicU64,
    /// Fills across all plans
    fills_emitted: AtomicU64,
    /// Requests rejected as invalid
    rejected_requests: AtomicU64,
    /// Snapshot loads that failed
    snapshot_failures: AtomicU64,
    /// Last plan timestamp (Unix millis)
    last_plan_time: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

/// Metrics snapshot for API export
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub plans_served: u64,
    pub partial_plans: u64,
    pub fills_emitted: u64,
    pub rejected_requests: u64,
    pub snapshot_failures: u64,
    pub last_plan_time: u64,
    pub plan_rate: f64, // plans per second
    pub uptime_seconds: u64,
}

impl MetricsCollector {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            plans_served: AtomicU64::new(0),
            partial_plans: AtomicU64::new(0),
            fills_emitted: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
            snapshot_failures: AtomicU64::new(0),
            last_plan_time: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a served plan
    #[inline]
    pub fn record_plan(&self, fills: usize, partial: bool) {
        self.plans_served.fetch_add(1, Ordering::Relaxed);
        self.fills_emitted.fetch_add(fills as u64, Ordering::Relaxed);
        if partial {
            self.partial_plans.fetch_add(1, Ordering::Relaxed);
        }
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.last_plan_time.store(now, Ordering::Relaxed);
    }

    /// Record a request rejected by validation
    #[inline]
    pub fn record_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed snapshot load
    #[inline]
    pub fn record_snapshot_failure(&self) {
        self.snapshot_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let plans = self.plans_served.load(Ordering::Relaxed);
        let uptime = self.start_time.elapsed().as_secs();
        let rate = if uptime > 0 {
            plans as f64 / uptime as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            plans_served: plans,
            partial_plans: self.partial_plans.load(Ordering::Relaxed),
            fills_emitted: self.fills_emitted.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            snapshot_failures: self.snapshot_failures.load(Ordering::Relaxed),
            last_plan_time: self.last_plan_time.load(Ordering::Relaxed),
            plan_rate: rate,
            uptime_seconds: uptime,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
