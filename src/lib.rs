//! # Limit-Order Matching Engine
//!
//! An in-memory, single-symbol limit order book that matches buy and sell
//! orders by **price-time priority**, produces trade records, and maintains
//! a consistent per-level view of aggregate liquidity.
//!
//! ## Key Features
//!
//! - **Price-time priority matching**: best price wins; ties at a price are
//!   consumed strictly first-in-first-out, with no proration.
//!
//! - **Five order-lifetime disciplines**: good-till-cancel, good-for-day,
//!   fill-and-kill (immediate-or-cancel), fill-or-kill, and market orders.
//!   Fill-or-kill feasibility is pre-checked against incrementally
//!   maintained per-level aggregates, so the check is O(levels) rather than
//!   O(orders) and never mutates the book.
//!
//! - **O(1) order lifecycle**: resident orders live in an arena and are
//!   threaded into intrusive per-level FIFOs; cancellation from the middle
//!   of a queue is constant-time via the id index's position handle.
//!
//! - **Good-for-day expiry**: a background worker wakes shortly after a
//!   configurable daily local-time cutoff (16:00 by default) and cancels
//!   every resident good-for-day order. Dropping the book shuts the worker
//!   down and joins it.
//!
//! - **Trade notifications**: an optional listener receives each add's
//!   trade batch, invoked strictly after the book mutex is released.
//!
//! ## Concurrency Model
//!
//! The engine is single-writer: every mutating operation serializes on one
//! internal mutex guarding the side books, the id index and the aggregate
//! table. An add, its matching to quiescence and any fill-and-kill tail
//! cleanup form a single critical section, so the trade list returned by an
//! add reflects exactly the matches that order participated in. The expiry
//! worker contends for the same mutex; its timed wait releases the mutex
//! while sleeping.
//!
//! ## Example
//!
//! ```
//! use matchbook::{Order, OrderBook, Side, TimeInForce};
//!
//! let book = OrderBook::new("ACME");
//!
//! // Seed an ask, then cross it with a buy.
//! book.add_order(Order::new(TimeInForce::GoodTillCancel, 1, Side::Sell, 101, 5));
//! let trades = book.add_order(Order::new(TimeInForce::GoodTillCancel, 2, Side::Buy, 102, 8));
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].quantity(), 5);
//!
//! // The 3-unit residual rests at 102.
//! assert_eq!(book.len(), 1);
//! assert_eq!(book.best_bid(), Some(102));
//! ```
//!
//! ## Outcome Semantics
//!
//! The engine surfaces operation outcomes by return value, not by errors: a
//! duplicate id, an unfillable market order, an uncrossable fill-and-kill
//! or an infeasible fill-or-kill all return an empty trade list, and
//! cancelling a missing id is a no-op. [`OrderBookError`] covers the
//! genuinely fallible edges (expiry configuration, snapshot serialization).

pub mod orderbook;

pub mod prelude;
mod utils;

pub use orderbook::expiry::{DEFAULT_CUTOFF_HOUR, DEFAULT_SLACK, ExpiryConfig};
pub use orderbook::order::{Order, OrderId, OrderModify, Price, Quantity, Side, TimeInForce};
pub use orderbook::snapshot::{BookDepth, LevelInfo};
pub use orderbook::trade::{Trade, TradeInfo, TradeListener};
pub use orderbook::{OrderBook, OrderBookError};
pub use utils::current_time_millis;
