//! Fill plan produced by the allocator

use crate::core::{FixedPoint8, Side};

/// One matched consumption of a resting order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub venue_id: String,
    /// Resting order this fill is matched against
    pub order_id: String,
    /// Side of the incoming request
    pub side: Side,
    pub quantity: FixedPoint8,
    pub price: FixedPoint8,
}

impl Fill {
    /// quantity * price, exact for snapshot-range amounts
    #[inline]
    pub fn notional(&self) -> FixedPoint8 {
        self.quantity.saturating_mul(self.price)
    }
}

/// Ordered fills plus their total cost (buy) or revenue (sell)
///
/// `total` is always the exact sum of `quantity * price` over `fills`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillPlan {
    pub fills: Vec<Fill>,
    pub total: FixedPoint8,
}

impl FillPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of quantities over all fills
    pub fn filled_quantity(&self) -> FixedPoint8 {
        self.fills
            .iter()
            .fold(FixedPoint8::ZERO, |acc, fill| acc.saturating_add(fill.quantity))
    }

    /// True when the fills cover the requested quantity
    pub fn is_complete(&self, requested: FixedPoint8) -> bool {
        self.filled_quantity() >= requested
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fills.len()
    }
}
