//! Trade records produced by the matching engine, and the trade listener.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::order::{OrderId, Price, Quantity};
use crate::utils::current_time_millis;

/// One side's fill within a trade.
///
/// The price is the residing order's own limit price, not a midpoint; this
/// preserves maker/taker price semantics when bid and ask limits differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeInfo {
    /// Id of the order that participated in the fill
    pub order_id: OrderId,
    /// The participating order's own limit price
    pub price: Price,
    /// Quantity exchanged in this fill
    pub quantity: Quantity,
}

/// A matched pair of fills: one bid side, one ask side.
///
/// Trades are append-only outputs of [`crate::OrderBook::add_order`]; the
/// quantities on both legs are always equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier for this execution
    pub transaction_id: Uuid,
    /// Execution time, milliseconds since the Unix epoch
    pub timestamp: u64,
    /// The buy-side fill
    pub bid: TradeInfo,
    /// The sell-side fill
    pub ask: TradeInfo,
}

impl Trade {
    /// Create a trade from its two fills, stamping a fresh transaction id.
    #[must_use]
    pub fn new(bid: TradeInfo, ask: TradeInfo) -> Self {
        debug_assert_eq!(bid.quantity, ask.quantity, "trade legs must match");
        Self {
            transaction_id: Uuid::new_v4(),
            timestamp: current_time_millis(),
            bid,
            ask,
        }
    }

    /// The quantity exchanged, identical on both legs.
    #[must_use]
    #[inline]
    pub fn quantity(&self) -> Quantity {
        self.bid.quantity
    }
}

/// Callback invoked with the trade batch produced by each add.
///
/// Listeners run strictly after the book mutex has been released, so they
/// may call back into the book without deadlocking; they must not assume
/// the book still reflects the state that produced the batch.
pub type TradeListener = Arc<dyn Fn(&[Trade]) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_reports_the_shared_quantity() {
        let trade = Trade::new(
            TradeInfo {
                order_id: 1,
                price: 102,
                quantity: 5,
            },
            TradeInfo {
                order_id: 2,
                price: 101,
                quantity: 5,
            },
        );

        assert_eq!(trade.quantity(), 5);
        assert_eq!(trade.bid.price, 102);
        assert_eq!(trade.ask.price, 101);
    }

    #[test]
    fn transaction_ids_are_unique() {
        let leg = TradeInfo {
            order_id: 1,
            price: 100,
            quantity: 1,
        };
        let a = Trade::new(leg, leg);
        let b = Trade::new(leg, leg);
        assert_ne!(a.transaction_id, b.transaction_id);
    }

    #[test]
    fn trade_round_trips_through_json() {
        let trade = Trade::new(
            TradeInfo {
                order_id: 10,
                price: 250,
                quantity: 3,
            },
            TradeInfo {
                order_id: 11,
                price: 249,
                quantity: 3,
            },
        );

        let json = serde_json::to_string(&trade).expect("serializes");
        let back: Trade = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back.transaction_id, trade.transaction_id);
        assert_eq!(back.bid, trade.bid);
        assert_eq!(back.ask, trade.ask);
    }
}
