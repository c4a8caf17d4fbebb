//! Core types shared by the allocator and the service layer
//!
//! - FixedPoint8: Fixed-point arithmetic for prices, quantities and balances
//! - Venue: Exchange snapshot (funds and resting order book)
//! - Side: Buy/Sell for requests and resting orders

pub mod fixed_point;
pub mod venue;

pub use fixed_point::{FixedPoint8, ParseFixedError};
pub use venue::{Funds, OrderBook, OrderKind, RestingOrder, Side, UnknownSide, Venue};
