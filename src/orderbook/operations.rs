//! Order book operations: adding, cancelling and modifying orders.

use tracing::trace;

use super::book::OrderBook;
use super::order::{Order, OrderId, OrderModify};
use super::trade::Trade;

impl OrderBook {
    /// Add an order to the book and match it to quiescence.
    ///
    /// Returns the trades the order participated in, in the order the
    /// matching loop produced them. The list is empty on any silent reject:
    /// a duplicate id, a market order with no opposing liquidity, a
    /// fill-and-kill with no crossable level, or a fill-or-kill whose
    /// feasibility pre-check fails.
    ///
    /// The admission check, insertion, matching and any fill-and-kill tail
    /// cancellation form one critical section; the trade listener, if set,
    /// is invoked after the lock is released.
    pub fn add_order(&self, order: Order) -> Vec<Trade> {
        trace!(
            "adding order {} {} {} {} x {}",
            order.id(),
            order.time_in_force(),
            order.side(),
            order.price(),
            order.initial_quantity()
        );

        let trades = {
            let mut state = self.shared.lock();
            state.admit(order)
        };

        if !trades.is_empty() {
            if let Some(listener) = &self.trade_listener {
                listener(&trades);
            }
        }

        trades
    }

    /// Cancel a resident order. Cancelling a missing id is a no-op.
    pub fn cancel_order(&self, id: OrderId) {
        let mut state = self.shared.lock();
        if state.cancel(id).is_some() {
            trace!("cancelled order {id}");
        }
    }

    /// Cancel a batch of orders under a single critical section.
    ///
    /// Ids that are not resident are skipped. This is the path the expiry
    /// worker uses for its end-of-day sweep.
    pub fn cancel_orders(&self, ids: &[OrderId]) {
        let mut state = self.shared.lock();
        for &id in ids {
            if state.cancel(id).is_some() {
                trace!("cancelled order {id}");
            }
        }
    }

    /// Replace a resident order's side, price and quantity.
    ///
    /// The replacement is admitted as a fresh order carrying the existing
    /// order's time-in-force, so it joins the tail of its destination queue
    /// and loses time priority. Returns the trades produced by the
    /// re-admission; empty when the id is not resident.
    ///
    /// The cancel and the re-add are two separate critical sections;
    /// atomicity across them is not provided.
    pub fn modify_order(&self, modify: OrderModify) -> Vec<Trade> {
        let time_in_force = {
            let state = self.shared.lock();
            match state.key_of(modify.id()) {
                Some(key) => state.order(key).time_in_force(),
                None => return Vec::new(),
            }
        };

        trace!(
            "modifying order {} to {} {} x {}",
            modify.id(),
            modify.side(),
            modify.price(),
            modify.quantity()
        );

        self.cancel_order(modify.id());
        self.add_order(modify.into_order(time_in_force))
    }
}
