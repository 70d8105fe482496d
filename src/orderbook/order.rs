//! Order model: sides, time-in-force disciplines, orders and modify requests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::current_time_millis;

/// Unique order identifier supplied by the caller.
pub type OrderId = u64;

/// Price in the book's smallest quotation unit.
pub type Price = u128;

/// Quantity in the book's smallest tradeable unit.
pub type Quantity = u64;

/// The side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A buy (bid) order
    Buy,
    /// A sell (ask) order
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    #[inline]
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order-lifetime discipline.
///
/// Only `GoodTillCancel` and `GoodForDay` orders can become resident in the
/// book; the other three either execute immediately or are rejected at
/// admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Resides until filled or cancelled
    GoodTillCancel,
    /// Resides until filled, cancelled, or the daily cutoff
    GoodForDay,
    /// Matches immediately, any residual is cancelled (a.k.a. immediate-or-cancel)
    FillAndKill,
    /// Matches in full immediately or is rejected without residence
    FillOrKill,
    /// Unpriced taker; rewritten on admission to `GoodTillCancel` at the
    /// worst available opposing price
    Market,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::GoodTillCancel => write!(f, "GTC"),
            TimeInForce::GoodForDay => write!(f, "GFD"),
            TimeInForce::FillAndKill => write!(f, "FAK"),
            TimeInForce::FillOrKill => write!(f, "FOK"),
            TimeInForce::Market => write!(f, "MKT"),
        }
    }
}

/// A single order: immutable identity plus a mutable remaining quantity.
///
/// The remaining quantity is only ever reduced, by the matching engine. An
/// order with `remaining_quantity() == 0` is fully filled and no longer
/// resident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    side: Side,
    time_in_force: TimeInForce,
    price: Price,
    initial_quantity: Quantity,
    remaining_quantity: Quantity,
    timestamp: u64,
}

impl Order {
    /// Create a new limit order.
    ///
    /// # Arguments
    /// * `time_in_force` — Lifetime discipline for this order.
    /// * `id` — Unique order identifier. Adding a duplicate id is a no-op.
    /// * `side` — Buy or Sell.
    /// * `price` — Limit price.
    /// * `quantity` — Initial quantity.
    #[must_use]
    pub fn new(
        time_in_force: TimeInForce,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            side,
            time_in_force,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
            timestamp: current_time_millis(),
        }
    }

    /// Create a market order.
    ///
    /// A market order carries no meaningful price of its own; on admission
    /// the engine rewrites it to `GoodTillCancel` at the worst available
    /// opposing price so that a single matching path handles the crossing.
    #[must_use]
    pub fn market(id: OrderId, side: Side, quantity: Quantity) -> Self {
        Self::new(TimeInForce::Market, id, side, 0, quantity)
    }

    /// The order's unique identifier.
    #[must_use]
    #[inline]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// The order's side.
    #[must_use]
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// The order's lifetime discipline.
    ///
    /// For an admitted ex-market order this reports `GoodTillCancel`, the
    /// discipline it was rewritten to.
    #[must_use]
    #[inline]
    pub fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// The order's limit price.
    #[must_use]
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// The quantity the order was created with.
    #[must_use]
    #[inline]
    pub fn initial_quantity(&self) -> Quantity {
        self.initial_quantity
    }

    /// The quantity not yet filled.
    #[must_use]
    #[inline]
    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    /// The quantity filled so far.
    #[must_use]
    #[inline]
    pub fn filled_quantity(&self) -> Quantity {
        self.initial_quantity - self.remaining_quantity
    }

    /// True once the order is completely filled.
    #[must_use]
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Creation timestamp, milliseconds since the Unix epoch.
    #[must_use]
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Reduce the remaining quantity by `quantity`.
    ///
    /// Callers must never fill more than remains; the matching engine fills
    /// with the minimum of both sides' remainders.
    pub(crate) fn fill(&mut self, quantity: Quantity) {
        debug_assert!(
            quantity <= self.remaining_quantity,
            "fill of {quantity} exceeds remaining {remaining} on order {id}",
            remaining = self.remaining_quantity,
            id = self.id,
        );
        self.remaining_quantity -= quantity;
    }

    /// Rewrite a market order into a resident-capable limit order.
    pub(crate) fn to_good_till_cancel(&mut self, price: Price) {
        debug_assert!(
            self.time_in_force == TimeInForce::Market,
            "only market orders are rewritten, order {id} is {tif}",
            id = self.id,
            tif = self.time_in_force,
        );
        self.price = price;
        self.time_in_force = TimeInForce::GoodTillCancel;
    }
}

/// A request to replace an existing order's side, price and quantity.
///
/// The replacement is admitted as a fresh order carrying the existing
/// order's time-in-force; it joins the tail of its destination queue, so
/// time priority is not preserved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderModify {
    id: OrderId,
    side: Side,
    price: Price,
    quantity: Quantity,
}

impl OrderModify {
    /// Create a modify request for the order with the given id.
    #[must_use]
    pub fn new(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
        }
    }

    /// The id of the order to replace.
    #[must_use]
    #[inline]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// The replacement side.
    #[must_use]
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// The replacement price.
    #[must_use]
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// The replacement quantity.
    #[must_use]
    #[inline]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Build the replacement order, carrying over the existing order's
    /// time-in-force.
    #[must_use]
    pub fn into_order(self, time_in_force: TimeInForce) -> Order {
        Order::new(time_in_force, self.id, self.side, self.price, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_reduces_remaining_only() {
        let mut order = Order::new(TimeInForce::GoodTillCancel, 1, Side::Buy, 100, 10);
        order.fill(4);
        assert_eq!(order.remaining_quantity(), 6);
        assert_eq!(order.initial_quantity(), 10);
        assert_eq!(order.filled_quantity(), 4);
        assert!(!order.is_filled());

        order.fill(6);
        assert!(order.is_filled());
        assert_eq!(order.filled_quantity(), 10);
    }

    #[test]
    fn market_rewrite_sets_price_and_discipline() {
        let mut order = Order::market(7, Side::Buy, 5);
        assert_eq!(order.time_in_force(), TimeInForce::Market);

        order.to_good_till_cancel(250);
        assert_eq!(order.time_in_force(), TimeInForce::GoodTillCancel);
        assert_eq!(order.price(), 250);
        assert_eq!(order.remaining_quantity(), 5);
    }

    #[test]
    fn modify_builds_replacement_with_original_discipline() {
        let modify = OrderModify::new(3, Side::Sell, 120, 8);
        let order = modify.into_order(TimeInForce::GoodForDay);

        assert_eq!(order.id(), 3);
        assert_eq!(order.side(), Side::Sell);
        assert_eq!(order.price(), 120);
        assert_eq!(order.initial_quantity(), 8);
        assert_eq!(order.time_in_force(), TimeInForce::GoodForDay);
    }

    #[test]
    fn side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}
