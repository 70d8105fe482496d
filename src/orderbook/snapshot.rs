//! Read-only depth snapshots of per-level aggregate liquidity.

use serde::{Deserialize, Serialize};

use super::book::OrderBook;
use super::error::OrderBookError;
use super::level::BookState;
use super::order::{Order, Price, Quantity, Side};
use crate::utils::current_time_millis;

/// Aggregate liquidity at one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// The level's price
    pub price: Price,
    /// Summed remaining quantity of the level's resident orders
    pub quantity: Quantity,
    /// Number of resident orders at the level
    pub order_count: usize,
}

/// A depth snapshot of the whole book, taken under the lock.
///
/// Bids are ordered best-first (descending price), asks best-first
/// (ascending price).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDepth {
    /// The symbol this snapshot belongs to
    pub symbol: String,
    /// When the snapshot was taken, milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Bid levels, best (highest price) first
    pub bids: Vec<LevelInfo>,
    /// Ask levels, best (lowest price) first
    pub asks: Vec<LevelInfo>,
}

impl BookDepth {
    /// The best bid level captured in this snapshot.
    #[must_use]
    pub fn best_bid(&self) -> Option<&LevelInfo> {
        self.bids.first()
    }

    /// The best ask level captured in this snapshot.
    #[must_use]
    pub fn best_ask(&self) -> Option<&LevelInfo> {
        self.asks.first()
    }

    /// Total quantity captured on one side.
    #[must_use]
    pub fn total_quantity(&self, side: Side) -> Quantity {
        let levels = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        levels.iter().map(|level| level.quantity).sum()
    }

    /// Serialize this snapshot to JSON.
    ///
    /// # Errors
    /// Returns [`OrderBookError::SerializationError`] when encoding fails.
    pub fn to_json(&self) -> Result<String, OrderBookError> {
        serde_json::to_string(self).map_err(|err| OrderBookError::SerializationError {
            message: err.to_string(),
        })
    }

    /// Deserialize a snapshot from JSON.
    ///
    /// # Errors
    /// Returns [`OrderBookError::DeserializationError`] when decoding fails.
    pub fn from_json(json: &str) -> Result<Self, OrderBookError> {
        serde_json::from_str(json).map_err(|err| OrderBookError::DeserializationError {
            message: err.to_string(),
        })
    }
}

impl BookState {
    /// Build both sides' level infos from the queues, best-first.
    ///
    /// Quantities are recomputed from the resident orders rather than read
    /// from the aggregate table; debug builds verify the two agree.
    pub(super) fn level_infos(&self) -> (Vec<LevelInfo>, Vec<LevelInfo>) {
        #[cfg(debug_assertions)]
        self.assert_aggregates_consistent();

        let collect = |(price, level): (&Price, &super::level::Level)| LevelInfo {
            price: *price,
            quantity: self.iter_level(level).map(Order::remaining_quantity).sum(),
            order_count: level.len(),
        };

        let bids = self.bids.iter().rev().map(collect).collect();
        let asks = self.asks.iter().map(collect).collect();
        (bids, asks)
    }
}

impl OrderBook {
    /// Take a depth snapshot: every level's price and summed remaining
    /// quantity on both sides, best-first.
    #[must_use]
    pub fn level_infos(&self) -> BookDepth {
        let (bids, asks) = {
            let state = self.shared.lock();
            state.level_infos()
        };

        BookDepth {
            symbol: self.symbol().to_string(),
            timestamp: current_time_millis(),
            bids,
            asks,
        }
    }
}
