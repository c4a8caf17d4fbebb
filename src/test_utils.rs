//! Test builders for venues and resting orders
//!
//! Amounts are whole units unless a helper says otherwise.

use crate::core::{FixedPoint8, Funds, OrderBook, RestingOrder, Side, Venue};

/// Whole units as FixedPoint8
pub fn units(value: i64) -> FixedPoint8 {
    FixedPoint8::from_units(value).expect("test amount out of range")
}

/// Sell-side resting order (ask)
pub fn ask(id: &str, quantity: i64, price: i64) -> RestingOrder {
    RestingOrder::limit(id, Side::Sell, units(quantity), units(price))
}

/// Buy-side resting order (bid)
pub fn bid(id: &str, quantity: i64, price: i64) -> RestingOrder {
    RestingOrder::limit(id, Side::Buy, units(quantity), units(price))
}

/// Venue with the given balances and book
pub fn venue(
    id: &str,
    crypto: i64,
    euro: i64,
    bids: Vec<RestingOrder>,
    asks: Vec<RestingOrder>,
) -> Venue {
    Venue::new(id, Funds::new(units(crypto), units(euro)), OrderBook { bids, asks })
}
