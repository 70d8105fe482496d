//! The `OrderBook` handle: construction, shared state and the read surface.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::trace;

use super::expiry::{self, ExpiryConfig};
use super::level::BookState;
use super::order::{OrderId, Price, Side};
use super::trade::TradeListener;

/// State shared between the book handle and the expiry worker.
///
/// The mutex is the engine's sole synchronization point for book state; the
/// condition variable exists only to interrupt the worker's timed wait at
/// shutdown.
pub(super) struct Shared {
    pub(super) state: Mutex<BookState>,
    pub(super) shutdown_signal: Condvar,
    pub(super) shutdown: AtomicBool,
}

impl Shared {
    /// Acquire the book mutex.
    ///
    /// A poisoned mutex means a writer panicked mid-mutation and the book's
    /// invariants can no longer be trusted; aborting is the only safe
    /// response.
    pub(super) fn lock(&self) -> MutexGuard<'_, BookState> {
        self.state.lock().expect("order book mutex poisoned")
    }
}

/// A single-symbol limit order book with price-time priority matching.
///
/// All mutating operations serialize on one internal mutex; an add, its
/// matching to quiescence and any tail cleanup form a single critical
/// section. A background worker cancels resident good-for-day orders at a
/// daily local-time cutoff and is joined when the book is dropped.
///
/// # Examples
///
/// ```
/// use matchbook::{Order, OrderBook, Side, TimeInForce};
///
/// let book = OrderBook::new("ACME");
/// let trades = book.add_order(Order::new(TimeInForce::GoodTillCancel, 1, Side::Buy, 100, 10));
/// assert!(trades.is_empty());
/// assert_eq!(book.len(), 1);
/// assert_eq!(book.best_bid(), Some(100));
/// ```
pub struct OrderBook {
    symbol: String,
    pub(super) shared: Arc<Shared>,
    pub(super) trade_listener: Option<TradeListener>,
    worker: Option<JoinHandle<()>>,
}

impl OrderBook {
    /// Create a new order book for the given symbol with the default expiry
    /// configuration (16:00 local cutoff, 100 ms slack).
    #[must_use]
    pub fn new(symbol: &str) -> Self {
        Self::build(symbol, ExpiryConfig::default(), None)
    }

    /// Create a new order book with an explicit expiry configuration.
    #[must_use]
    pub fn with_expiry(symbol: &str, expiry: ExpiryConfig) -> Self {
        Self::build(symbol, expiry, None)
    }

    /// Create a new order book with a trade listener.
    ///
    /// The listener receives each add's non-empty trade batch after the
    /// book mutex has been released.
    #[must_use]
    pub fn with_trade_listener(symbol: &str, trade_listener: TradeListener) -> Self {
        Self::build(symbol, ExpiryConfig::default(), Some(trade_listener))
    }

    fn build(symbol: &str, config: ExpiryConfig, trade_listener: Option<TradeListener>) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(BookState::new()),
            shutdown_signal: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(format!("{symbol}-gfd-expiry"))
            .spawn(move || expiry::run(worker_shared, config))
            .expect("failed to spawn expiry worker");

        trace!("order book {symbol} created");

        Self {
            symbol: symbol.to_string(),
            shared,
            trade_listener,
            worker: Some(worker),
        }
    }

    /// Set a trade listener for this order book.
    pub fn set_trade_listener(&mut self, trade_listener: TradeListener) {
        self.trade_listener = Some(trade_listener);
    }

    /// Remove the trade listener from this order book.
    pub fn remove_trade_listener(&mut self) {
        self.trade_listener = None;
    }

    /// The symbol of this order book.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of resident orders across both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    /// True when no orders are resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an order with the given id is resident.
    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.shared.lock().contains(id)
    }

    /// The best (highest) resident bid price, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.shared.lock().best_price(Side::Buy)
    }

    /// The best (lowest) resident ask price, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.shared.lock().best_price(Side::Sell)
    }

    /// The spread (best ask − best bid), if both sides are populated.
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        let state = self.shared.lock();
        match (
            state.best_price(Side::Buy),
            state.best_price(Side::Sell),
        ) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// The mid price (average of best bid and best ask), if both sides are
    /// populated.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        let state = self.shared.lock();
        match (
            state.best_price(Side::Buy),
            state.best_price(Side::Sell),
        ) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// The price of the most recent execution, if any trade has occurred.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<Price> {
        self.shared.lock().last_trade_price
    }
}

impl Drop for OrderBook {
    /// Raise the shutdown flag, wake the expiry worker and join it.
    fn drop(&mut self) {
        self.shared
            .shutdown
            .store(true, std::sync::atomic::Ordering::Release);
        self.shared.shutdown_signal.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        trace!("order book {} shut down", self.symbol);
    }
}
