//! Book-state internals: arena-backed price-level queues and per-level
//! aggregates.
//!
//! Resident orders live in a single slab arena and are threaded into one
//! intrusive doubly-linked FIFO per price level. The slab key doubles as the
//! order's position handle: erasing from the middle of a queue is O(1) and
//! handles stay valid across unrelated insertions and removals.

use slab::Slab;
use std::collections::{BTreeMap, HashMap};

use super::order::{Order, OrderId, Price, Quantity, Side, TimeInForce};

/// A resident order threaded into its price level's FIFO.
#[derive(Debug)]
pub(super) struct OrderNode {
    pub(super) order: Order,
    prev: Option<usize>,
    next: Option<usize>,
}

/// One price level: the arrival-ordered queue of resident orders at a price.
///
/// A level is present in its side's map iff its queue is non-empty.
#[derive(Debug, Default)]
pub(super) struct Level {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl Level {
    /// Arena key of the order at the front of the queue.
    #[inline]
    pub(super) fn head(&self) -> Option<usize> {
        self.head
    }

    /// Number of resident orders at this level.
    #[inline]
    pub(super) fn len(&self) -> usize {
        self.len
    }
}

/// Aggregate liquidity at one price: resident-order count and summed
/// remaining quantity.
///
/// Kept incrementally so fill-or-kill feasibility is O(levels) instead of
/// O(orders).
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct LevelData {
    pub(super) order_count: usize,
    pub(super) quantity: Quantity,
}

/// The action that drives an aggregate update at a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LevelAction {
    /// A fresh order was inserted with its initial quantity.
    Add,
    /// An order left the level: cancellation, or a fill that emptied it.
    /// Carries the order's remaining quantity before it left.
    Remove,
    /// A partial fill that leaves the order resident.
    Match,
}

/// All mutable book state, guarded by the one book mutex.
///
/// The side maps, the id index, the arena and the aggregate table are
/// mutually consistent at every critical-section boundary.
#[derive(Debug)]
pub(super) struct BookState {
    arena: Slab<OrderNode>,
    pub(super) bids: BTreeMap<Price, Level>,
    pub(super) asks: BTreeMap<Price, Level>,
    index: HashMap<OrderId, usize>,
    /// Aggregates keyed by price, spanning both sides. At quiescence each
    /// present price belongs to exactly one side; crossed prices are
    /// consumed before the critical section ends.
    pub(super) levels: BTreeMap<Price, LevelData>,
    pub(super) last_trade_price: Option<Price>,
}

impl BookState {
    pub(super) fn new() -> Self {
        Self {
            arena: Slab::new(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::new(),
            levels: BTreeMap::new(),
            last_trade_price: None,
        }
    }

    /// Number of resident orders across both sides.
    #[inline]
    pub(super) fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub(super) fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub(super) fn side(&self, side: Side) -> &BTreeMap<Price, Level> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Best price on a side: highest bid, lowest ask.
    pub(super) fn best_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.bids.keys().next_back().copied(),
            Side::Sell => self.asks.keys().next().copied(),
        }
    }

    /// Worst price on a side: the opposite end of the ordered map.
    pub(super) fn worst_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.bids.keys().next().copied(),
            Side::Sell => self.asks.keys().next_back().copied(),
        }
    }

    #[inline]
    pub(super) fn order(&self, key: usize) -> &Order {
        &self.arena[key].order
    }

    #[inline]
    pub(super) fn order_mut(&mut self, key: usize) -> &mut Order {
        &mut self.arena[key].order
    }

    #[inline]
    pub(super) fn key_of(&self, id: OrderId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Append an order to the tail of its side's queue at its price and
    /// record it in the id index. Returns the arena key (position handle).
    ///
    /// The aggregate table is not touched here; admission applies the
    /// `Add` action separately.
    pub(super) fn push_back(&mut self, order: Order) -> usize {
        let id = order.id();
        let side = order.side();
        let price = order.price();

        let key = self.arena.insert(OrderNode {
            order,
            prev: None,
            next: None,
        });

        let side_map = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = side_map.entry(price).or_default();

        let old_tail = level.tail;
        level.tail = Some(key);
        level.len += 1;
        match old_tail {
            Some(tail) => {
                self.arena[tail].next = Some(key);
                self.arena[key].prev = Some(tail);
            }
            None => level.head = Some(key),
        }

        self.index.insert(id, key);
        key
    }

    /// Unlink the order at `key` from its queue and from the id index,
    /// erasing the price level if its queue became empty. O(1).
    ///
    /// Returns the removed order. The aggregate table is not touched here.
    pub(super) fn unlink(&mut self, key: usize) -> Order {
        let (prev, next) = {
            let node = &self.arena[key];
            (node.prev, node.next)
        };

        if let Some(prev) = prev {
            self.arena[prev].next = next;
        }
        if let Some(next) = next {
            self.arena[next].prev = prev;
        }

        let node = self.arena.remove(key);
        let price = node.order.price();
        let side_map = match node.order.side() {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };

        if let Some(level) = side_map.get_mut(&price) {
            if prev.is_none() {
                level.head = next;
            }
            if next.is_none() {
                level.tail = prev;
            }
            level.len -= 1;
            if level.len == 0 {
                side_map.remove(&price);
            }
        }

        self.index.remove(&node.order.id());
        node.order
    }

    /// Cancel a resident order: unlink it and apply the `Remove` aggregate
    /// action with its remaining quantity. Missing ids are a no-op.
    pub(super) fn cancel(&mut self, id: OrderId) -> Option<Order> {
        let key = self.key_of(id)?;
        let order = self.unlink(key);
        self.update_level(order.price(), order.remaining_quantity(), LevelAction::Remove);
        Some(order)
    }

    /// Apply one aggregate action at a price. When the count reaches zero
    /// the price key is erased from the table.
    pub(super) fn update_level(&mut self, price: Price, quantity: Quantity, action: LevelAction) {
        let data = self.levels.entry(price).or_default();

        match action {
            LevelAction::Add => {
                data.order_count += 1;
                data.quantity += quantity;
            }
            LevelAction::Remove => {
                debug_assert!(data.order_count > 0, "remove at {price} with zero count");
                debug_assert!(
                    data.quantity >= quantity,
                    "remove of {quantity} at {price} exceeds aggregate {aggregate}",
                    aggregate = data.quantity,
                );
                data.order_count -= 1;
                data.quantity -= quantity;
            }
            LevelAction::Match => {
                debug_assert!(
                    data.quantity >= quantity,
                    "match of {quantity} at {price} exceeds aggregate {aggregate}",
                    aggregate = data.quantity,
                );
                data.quantity -= quantity;
            }
        }

        if data.order_count == 0 {
            debug_assert!(
                data.quantity == 0,
                "aggregate at {price} emptied with {left} quantity left",
                left = data.quantity,
            );
            self.levels.remove(&price);
        }
    }

    /// Iterate the resident orders of one level in arrival order.
    pub(super) fn iter_level<'a>(&'a self, level: &Level) -> LevelIter<'a> {
        LevelIter {
            state: self,
            cursor: level.head,
        }
    }

    /// Ids of every resident order whose discipline is good-for-day.
    ///
    /// Admitted ex-market orders report good-till-cancel and are excluded.
    pub(super) fn good_for_day_ids(&self) -> Vec<OrderId> {
        self.arena
            .iter()
            .filter(|(_, node)| node.order.time_in_force() == TimeInForce::GoodForDay)
            .map(|(_, node)| node.order.id())
            .collect()
    }

    /// Verify the aggregate table against the queues. Debug builds only;
    /// called from the snapshot path.
    #[cfg(debug_assertions)]
    pub(super) fn assert_aggregates_consistent(&self) {
        for (side_map, side) in [(&self.bids, Side::Buy), (&self.asks, Side::Sell)] {
            for (price, level) in side_map {
                let data = self
                    .levels
                    .get(price)
                    .unwrap_or_else(|| panic!("no aggregate for {side} level {price}"));
                let quantity: Quantity = self
                    .iter_level(level)
                    .map(Order::remaining_quantity)
                    .sum();
                assert_eq!(
                    data.order_count,
                    level.len(),
                    "aggregate count diverged at {side} {price}"
                );
                assert_eq!(
                    data.quantity, quantity,
                    "aggregate quantity diverged at {side} {price}"
                );
            }
        }
    }
}

/// Arrival-order iterator over one level's resident orders.
pub(super) struct LevelIter<'a> {
    state: &'a BookState,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = &self.state.arena[key];
        self.cursor = node.next;
        Some(&node.order)
    }
}
