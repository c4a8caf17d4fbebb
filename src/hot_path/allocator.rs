//! Constrained greedy allocation across venues
//!
//! Walks ranked counter-side liquidity and takes as much of each resting
//! order as the request, the order and the owning venue's balance allow.
//! Single pass, no I/O: later decisions depend on balances consumed by
//! earlier fills, so the walk is strictly sequential.

use crate::core::{FixedPoint8, Funds, RestingOrder, Side, Venue};
use crate::hot_path::liquidity::{LiquidityAggregator, VenueBook};
use crate::hot_path::plan::{Fill, FillPlan};
use thiserror::Error;

/// Allocation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Unknown side or non-positive quantity. Raised before any balance is touched.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Validate a raw request before any allocation work
///
/// The side is matched case-insensitively against Buy/Sell (or
/// acquire/dispose); the quantity must be strictly positive.
pub fn validate_request(side: &str, quantity: FixedPoint8) -> Result<Side, AllocationError> {
    let side: Side = side
        .parse()
        .map_err(|e: crate::core::UnknownSide| AllocationError::InvalidRequest(e.to_string()))?;
    ensure_positive(quantity)?;
    Ok(side)
}

fn ensure_positive(quantity: FixedPoint8) -> Result<(), AllocationError> {
    if quantity.is_positive() {
        Ok(())
    } else {
        Err(AllocationError::InvalidRequest(format!(
            "amount must be greater than zero, got {}",
            quantity
        )))
    }
}

/// Validate and allocate in one call
///
/// See [`allocate`] for the contract on `venues`.
pub fn compute_fill_plan(
    venues: &mut [Venue],
    side: &str,
    quantity: FixedPoint8,
) -> Result<FillPlan, AllocationError> {
    let side = validate_request(side, quantity)?;
    allocate(venues, side, quantity)
}

/// Build the cheapest (buy) or richest (sell) fill plan for `quantity`
///
/// Consumes the balances of the venues it is given: every venue's `funds`
/// reflect the fills in the returned plan. Pass a request-scoped copy when
/// the snapshot must stay untouched. The only error is a non-positive
/// `quantity`, raised before any balance is touched.
///
/// Running out of liquidity or funds is not an error; the plan then covers
/// less than `quantity`.
pub fn allocate(
    venues: &mut [Venue],
    side: Side,
    quantity: FixedPoint8,
) -> Result<FillPlan, AllocationError> {
    ensure_positive(quantity)?;

    let mut balances: Vec<Funds> = venues.iter().map(|v| v.funds).collect();
    let plan = {
        let views: Vec<VenueBook<'_>> = venues
            .iter()
            .map(|v| VenueBook {
                id: &v.id,
                book: &v.book,
            })
            .collect();
        walk(&views, &mut balances, side, quantity)
    };

    for (venue, funds) in venues.iter_mut().zip(balances) {
        venue.funds = funds;
    }

    Ok(plan)
}

fn walk(views: &[VenueBook<'_>], balances: &mut [Funds], side: Side, quantity: FixedPoint8) -> FillPlan {
    let mut plan = FillPlan::new();
    let mut remaining = quantity;

    for entry in LiquidityAggregator::rank(views, side) {
        if !remaining.is_positive() {
            break;
        }

        let order = entry.order;
        let funds = &mut balances[entry.venue];
        let take = order
            .quantity
            .min(remaining)
            .min(capacity(funds, order, side));

        if !take.is_positive() {
            tracing::debug!(
                venue = entry.venue_id,
                order = %order.id,
                price = %order.price,
                "skipping order, venue balance exhausted"
            );
            continue;
        }

        let fill = Fill {
            venue_id: entry.venue_id.to_string(),
            order_id: order.id.clone(),
            side,
            quantity: take,
            price: order.price,
        };

        // take and price are snapshot-range values, so the notional is exact
        let notional = fill.notional();
        if !notional.is_positive() {
            tracing::debug!(
                venue = entry.venue_id,
                order = %order.id,
                quantity = %take,
                "skipping order, notional below 0.00000001"
            );
            continue;
        }

        match side {
            Side::Buy => {
                funds.crypto = funds.crypto.saturating_add(take);
                funds.euro = funds.euro.saturating_sub(notional);
            }
            Side::Sell => {
                funds.crypto = funds.crypto.saturating_sub(take);
                funds.euro = funds.euro.saturating_add(notional);
            }
        }
        plan.total = plan.total.saturating_add(notional);
        remaining = remaining.saturating_sub(take);
        plan.fills.push(fill);
    }

    plan
}

/// Most a venue can trade against `order` with its current balance
///
/// Buy: euro balance / price (truncated, so the notional never exceeds the
/// balance). Sell: the crypto balance. Zero for non-positive prices.
#[inline]
fn capacity(funds: &Funds, order: &RestingOrder, side: Side) -> FixedPoint8 {
    if !order.price.is_positive() {
        return FixedPoint8::ZERO;
    }
    match side {
        Side::Buy if !funds.euro.is_positive() => FixedPoint8::ZERO,
        // Only overflows when the balance dwarfs the price; nothing binds then
        Side::Buy => funds.euro.safe_div(order.price).unwrap_or(FixedPoint8::MAX),
        Side::Sell => funds.crypto,
    }
}
