//! Venue snapshot types
//!
//! A `Venue` is one exchange as seen at snapshot time: its balances and its
//! resting order book. Snapshots are plain owned values; clone one per request.

use super::FixedPoint8;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::PrimitiveDateTime;

/// Order side
///
/// For an incoming request `Buy` acquires the asset and `Sell` disposes of it.
/// For a resting order it is the side that order itself represents: asks are
/// `Sell` liquidity, bids are `Buy` liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Buy = 1,
    Sell = 2,
}

impl Side {
    /// Parse side from raw bytes, ASCII case-insensitive
    ///
    /// Accepts `buy`/`sell` and the aliases `acquire`/`dispose`.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.eq_ignore_ascii_case(b"buy") || bytes.eq_ignore_ascii_case(b"acquire") {
            Some(Self::Buy)
        } else if bytes.eq_ignore_ascii_case(b"sell") || bytes.eq_ignore_ascii_case(b"dispose") {
            Some(Self::Sell)
        } else {
            None
        }
    }

    /// The side of the resting liquidity a request on this side consumes
    #[inline(always)]
    pub const fn counter(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = UnknownSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.trim().as_bytes()).ok_or_else(|| UnknownSide(s.to_string()))
    }
}

/// Side string that is neither buy/acquire nor sell/dispose
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order side {0:?}, expected Buy or Sell")]
pub struct UnknownSide(pub String);

/// Resting order kind, as reported by the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderKind {
    #[default]
    Limit,
    Market,
}

/// A standing order in a venue's book
///
/// Immutable once loaded; the allocator derives how much of it is taken
/// without shrinking `quantity`.
#[derive(Debug, Clone, PartialEq)]
pub struct RestingOrder {
    /// Unique within the owning venue
    pub id: String,
    pub side: Side,
    pub kind: OrderKind,
    /// Base asset amount (BTC)
    pub quantity: FixedPoint8,
    /// Quote currency per unit (EUR/BTC)
    pub price: FixedPoint8,
    pub placed_at: Option<PrimitiveDateTime>,
}

impl RestingOrder {
    /// Create a limit order without a timestamp
    pub fn limit(id: impl Into<String>, side: Side, quantity: FixedPoint8, price: FixedPoint8) -> Self {
        Self {
            id: id.into(),
            side,
            kind: OrderKind::Limit,
            quantity,
            price,
            placed_at: None,
        }
    }
}

/// Balances a venue can spend
///
/// `crypto` is the base asset balance, `euro` the quote currency (capital).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Funds {
    pub crypto: FixedPoint8,
    pub euro: FixedPoint8,
}

impl Funds {
    pub const fn new(crypto: FixedPoint8, euro: FixedPoint8) -> Self {
        Self { crypto, euro }
    }
}

/// Both sides of a venue's book, in the venue's own order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    pub bids: Vec<RestingOrder>,
    pub asks: Vec<RestingOrder>,
}

impl OrderBook {
    /// Resting orders on the given side of the book
    ///
    /// `Sell` returns asks, `Buy` returns bids.
    #[inline]
    pub fn side(&self, side: Side) -> &[RestingOrder] {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }
}

/// One exchange at snapshot time
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: String,
    pub funds: Funds,
    pub book: OrderBook,
}

impl Venue {
    pub fn new(id: impl Into<String>, funds: Funds, book: OrderBook) -> Self {
        Self {
            id: id.into(),
            funds,
            book,
        }
    }
}
