//! Cross-venue liquidity ranking
//!
//! Flattens the counter-side books of every venue into one price-ranked
//! sequence. Each entry carries its owning venue, so the allocator never has
//! to search venues by order id.

use crate::core::{OrderBook, RestingOrder, Side};

/// Read-only view of one venue's book, indexed like the venue slice
#[derive(Debug, Clone, Copy)]
pub struct VenueBook<'a> {
    pub id: &'a str,
    pub book: &'a OrderBook,
}

/// A resting order tagged with the venue that owns it
#[derive(Debug, Clone, Copy)]
pub struct RankedOrder<'a> {
    /// Index of the owning venue in the slice passed to `rank`
    pub venue: usize,
    pub venue_id: &'a str,
    pub order: &'a RestingOrder,
}

/// Ranks counter-side liquidity for a request side
pub struct LiquidityAggregator;

impl LiquidityAggregator {
    /// Ranked liquidity a `side` request can consume
    ///
    /// Buy requests walk asks cheapest first; sell requests walk bids
    /// richest first. Only orders that are themselves on the counter side
    /// are collected. The sort is stable, so equal prices keep venue order
    /// and then book order.
    pub fn rank<'a>(venues: &[VenueBook<'a>], side: Side) -> impl Iterator<Item = RankedOrder<'a>> {
        let counter = side.counter();

        let mut ranked: Vec<RankedOrder<'a>> = venues
            .iter()
            .enumerate()
            .flat_map(|(venue, view)| {
                let (id, book) = (view.id, view.book);
                book.side(counter)
                    .iter()
                    .filter(move |order| order.side == counter)
                    .map(move |order| RankedOrder {
                        venue,
                        venue_id: id,
                        order,
                    })
            })
            .collect();

        match side {
            Side::Buy => ranked.sort_by(|a, b| a.order.price.cmp(&b.order.price)),
            Side::Sell => ranked.sort_by(|a, b| b.order.price.cmp(&a.order.price)),
        }

        ranked.into_iter()
    }
}
