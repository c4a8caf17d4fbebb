//! On-disk exchange snapshot format
//!
//! One JSON document per exchange:
//!
//! ```json
//! {
//!   "Id": "exchange-01",
//!   "AvailableFunds": { "Crypto": 10.8, "Euro": 116000 },
//!   "OrderBook": {
//!     "Bids": [{ "Order": { "Id": null, "Time": "0001-01-01T00:00:00",
//!                "Type": "Buy", "Kind": "Limit", "Amount": 0.01, "Price": 57226.46 } }],
//!     "Asks": []
//!   }
//! }
//! ```
//!
//! PascalCase keys are canonical, camelCase is accepted too.

use crate::core::{FixedPoint8, Funds, OrderBook, OrderKind, RestingOrder, Side, Venue};
use serde::Deserialize;
use time::macros::format_description;
use time::PrimitiveDateTime;

use super::SnapshotError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ExchangeFile {
    #[serde(alias = "id")]
    id: String,
    #[serde(default, alias = "availableFunds")]
    available_funds: FundsFile,
    #[serde(default, alias = "orderBook")]
    order_book: OrderBookFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FundsFile {
    #[serde(default, alias = "crypto")]
    crypto: FixedPoint8,
    #[serde(default, alias = "euro")]
    euro: FixedPoint8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OrderBookFile {
    #[serde(default, alias = "bids")]
    bids: Option<Vec<OrderEntry>>,
    #[serde(default, alias = "asks")]
    asks: Option<Vec<OrderEntry>>,
}

/// Book entries wrap the order in an `Order` object
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OrderEntry {
    #[serde(alias = "order")]
    order: OrderFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OrderFile {
    #[serde(default, alias = "id")]
    id: Option<String>,
    #[serde(default, alias = "time")]
    time: Option<String>,
    #[serde(default, rename = "Type", alias = "type")]
    side: Option<String>,
    #[serde(default, alias = "kind")]
    kind: Option<String>,
    #[serde(alias = "amount")]
    amount: FixedPoint8,
    #[serde(alias = "price")]
    price: FixedPoint8,
}

impl ExchangeFile {
    /// Convert into a venue, checking balances and order amounts
    pub(crate) fn into_venue(self) -> Result<Venue, SnapshotError> {
        let id = self.id;
        let funds = Funds::new(self.available_funds.crypto, self.available_funds.euro);
        if funds.crypto.is_negative() || funds.euro.is_negative() {
            return Err(SnapshotError::Invalid {
                venue: id,
                reason: "negative available funds".to_string(),
            });
        }

        let bids = convert_side(&id, "bid", Side::Buy, self.order_book.bids.unwrap_or_default())?;
        let asks = convert_side(&id, "ask", Side::Sell, self.order_book.asks.unwrap_or_default())?;

        Ok(Venue::new(id, funds, OrderBook { bids, asks }))
    }
}

fn convert_side(
    venue: &str,
    label: &str,
    implied: Side,
    entries: Vec<OrderEntry>,
) -> Result<Vec<RestingOrder>, SnapshotError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| convert_order(venue, label, implied, index, entry.order))
        .collect()
}

fn convert_order(
    venue: &str,
    label: &str,
    implied: Side,
    index: usize,
    order: OrderFile,
) -> Result<RestingOrder, SnapshotError> {
    let invalid = |reason: String| SnapshotError::Invalid {
        venue: venue.to_string(),
        reason,
    };

    let id = match order.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => format!("{}-{}-{}", venue, label, index),
    };

    let side = match order.side.as_deref() {
        None => implied,
        Some(raw) => raw
            .parse()
            .map_err(|e| invalid(format!("order {}: {}", id, e)))?,
    };

    if order.amount.is_negative() || order.price.is_negative() {
        return Err(invalid(format!("order {} has a negative amount or price", id)));
    }

    Ok(RestingOrder {
        kind: parse_kind(order.kind.as_deref()),
        placed_at: order.time.as_deref().and_then(parse_time),
        id,
        side,
        quantity: order.amount,
        price: order.price,
    })
}

fn parse_kind(raw: Option<&str>) -> OrderKind {
    match raw {
        Some(kind) if kind.eq_ignore_ascii_case("market") => OrderKind::Market,
        _ => OrderKind::Limit,
    }
}

/// `2024-03-01T12:30:00` with optional fractional seconds
fn parse_time(raw: &str) -> Option<PrimitiveDateTime> {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    PrimitiveDateTime::parse(raw, format).ok()
}
