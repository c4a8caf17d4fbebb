//! Allocation core - synchronous, no I/O
//!
//! This module contains the routing decision logic:
//! - Cross-venue liquidity ranking
//! - Constrained greedy allocation
//! - Fill plan assembly

pub mod allocator;
pub mod liquidity;
pub mod plan;

pub use allocator::{allocate, compute_fill_plan, validate_request, AllocationError};
pub use liquidity::{LiquidityAggregator, RankedOrder, VenueBook};
pub use plan::{Fill, FillPlan};
