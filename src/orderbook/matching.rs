//! The matching engine: admission policy, crossability, fill-or-kill
//! feasibility and the cross-matching loop.
//!
//! Everything here runs inside a single critical section of the book mutex;
//! an add, its matching to quiescence and any fill-and-kill tail cleanup are
//! never observed half-done by another writer.

use tracing::trace;

use super::level::{BookState, Level, LevelAction};
use super::order::{Order, OrderId, Price, Quantity, Side, TimeInForce};
use super::trade::{Trade, TradeInfo};

impl BookState {
    /// Whether an order at `price` on `side` would cross the opposite side's
    /// best level.
    pub(super) fn can_cross(&self, side: Side, price: Price) -> bool {
        match side {
            Side::Buy => self
                .best_price(Side::Sell)
                .is_some_and(|best_ask| price >= best_ask),
            Side::Sell => self
                .best_price(Side::Buy)
                .is_some_and(|best_bid| price <= best_bid),
        }
    }

    /// Whether the opposite side holds enough liquidity at prices crossing
    /// `price` to absorb `quantity` in full.
    ///
    /// This is a pure pre-check over the aggregate table; it never mutates
    /// the book. Its correctness rests on the aggregates being the exact
    /// sum of resident remainders.
    pub(super) fn can_fully_fill(&self, side: Side, price: Price, mut quantity: Quantity) -> bool {
        if !self.can_cross(side, price) {
            return false;
        }

        // Opposite side's best price bounds the crossing band.
        let threshold = match side {
            Side::Buy => self.best_price(Side::Sell),
            Side::Sell => self.best_price(Side::Buy),
        };

        for (&level_price, data) in &self.levels {
            let outside_band = threshold.is_some_and(|threshold| match side {
                Side::Buy => threshold > level_price,
                Side::Sell => threshold < level_price,
            });
            if outside_band {
                continue;
            }

            let beyond_limit = match side {
                Side::Buy => level_price > price,
                Side::Sell => level_price < price,
            };
            if beyond_limit {
                continue;
            }

            if quantity <= data.quantity {
                return true;
            }
            quantity -= data.quantity;
        }

        false
    }

    /// Admit an order: apply the per-discipline admission policy, insert it
    /// if admissible, and drive matching to quiescence.
    ///
    /// Returns the trades the order participated in; empty on any silent
    /// reject (duplicate id, unfillable market order, uncrossable
    /// fill-and-kill, infeasible fill-or-kill).
    pub(super) fn admit(&mut self, mut order: Order) -> Vec<Trade> {
        if self.contains(order.id()) {
            trace!("rejecting duplicate order id {}", order.id());
            return Vec::new();
        }

        if order.time_in_force() == TimeInForce::Market {
            // Rewriting to the worst opposing price lets the ordinary
            // matching path consume every crossable level.
            match self.worst_price(order.side().opposite()) {
                Some(worst) => order.to_good_till_cancel(worst),
                None => {
                    trace!(
                        "rejecting market order {}: no opposing liquidity",
                        order.id()
                    );
                    return Vec::new();
                }
            }
        }

        if order.time_in_force() == TimeInForce::FillAndKill
            && !self.can_cross(order.side(), order.price())
        {
            trace!("rejecting fill-and-kill order {}: no cross", order.id());
            return Vec::new();
        }

        if order.time_in_force() == TimeInForce::FillOrKill
            && !self.can_fully_fill(order.side(), order.price(), order.initial_quantity())
        {
            trace!(
                "rejecting fill-or-kill order {}: cannot fully fill {} at {}",
                order.id(),
                order.initial_quantity(),
                order.price()
            );
            return Vec::new();
        }

        let taker_id = order.id();
        let price = order.price();
        let initial = order.initial_quantity();

        self.push_back(order);
        self.update_level(price, initial, LevelAction::Add);

        self.match_to_quiescence(taker_id)
    }

    /// Run the cross-matching loop until best bid no longer meets best ask,
    /// then cancel any fill-and-kill residual left at the top of either
    /// side.
    fn match_to_quiescence(&mut self, taker_id: OrderId) -> Vec<Trade> {
        let mut trades = Vec::new();

        loop {
            let (Some(bid_price), Some(ask_price)) =
                (self.best_price(Side::Buy), self.best_price(Side::Sell))
            else {
                break;
            };
            if bid_price < ask_price {
                break;
            }

            // Consume the two top queues head against head, strict FIFO.
            loop {
                let bid_key = self.bids.get(&bid_price).and_then(Level::head);
                let ask_key = self.asks.get(&ask_price).and_then(Level::head);
                let (Some(bid_key), Some(ask_key)) = (bid_key, ask_key) else {
                    break;
                };

                let quantity = Quantity::min(
                    self.order(bid_key).remaining_quantity(),
                    self.order(ask_key).remaining_quantity(),
                );

                self.order_mut(bid_key).fill(quantity);
                self.order_mut(ask_key).fill(quantity);

                let (bid_id, bid_own_price, bid_filled) = {
                    let order = self.order(bid_key);
                    (order.id(), order.price(), order.is_filled())
                };
                let (ask_id, ask_own_price, ask_filled) = {
                    let order = self.order(ask_key);
                    (order.id(), order.price(), order.is_filled())
                };

                if bid_filled {
                    self.unlink(bid_key);
                }
                if ask_filled {
                    self.unlink(ask_key);
                }

                // Both legs report the residing orders' own prices.
                trades.push(Trade::new(
                    TradeInfo {
                        order_id: bid_id,
                        price: bid_own_price,
                        quantity,
                    },
                    TradeInfo {
                        order_id: ask_id,
                        price: ask_own_price,
                        quantity,
                    },
                ));

                // The resident (maker) leg sets the last trade price.
                self.last_trade_price = Some(if bid_id == taker_id {
                    ask_own_price
                } else {
                    bid_own_price
                });

                trace!(
                    "executed {} at bid {} / ask {} between {} and {}",
                    quantity,
                    bid_own_price,
                    ask_own_price,
                    bid_id,
                    ask_id
                );

                let bid_action = if bid_filled {
                    LevelAction::Remove
                } else {
                    LevelAction::Match
                };
                self.update_level(bid_own_price, quantity, bid_action);

                let ask_action = if ask_filled {
                    LevelAction::Remove
                } else {
                    LevelAction::Match
                };
                self.update_level(ask_own_price, quantity, ask_action);
            }
        }

        // A fill-and-kill order that crossed but only partially filled is
        // still at the top of its side here; cancel the residual.
        for side in [Side::Buy, Side::Sell] {
            let head_key = self
                .best_price(side)
                .and_then(|best| self.side(side).get(&best))
                .and_then(Level::head);
            if let Some(key) = head_key {
                let order = self.order(key);
                if order.time_in_force() == TimeInForce::FillAndKill {
                    let id = order.id();
                    trace!("cancelling fill-and-kill residual {id}");
                    self.cancel(id);
                }
            }
        }

        trades
    }
}
