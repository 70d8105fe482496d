//! Order book implementation: book state, matching engine, order lifetime
//! disciplines and the good-for-day expiry worker.

pub mod book;
pub mod error;
/// Good-for-day expiry configuration and worker.
pub mod expiry;
mod level;
mod matching;
pub mod operations;
/// Order model: sides, disciplines, orders and modify requests.
pub mod order;
pub mod snapshot;
mod tests;
/// Trade records and the trade listener.
pub mod trade;

pub use book::OrderBook;
pub use error::OrderBookError;
pub use expiry::{DEFAULT_CUTOFF_HOUR, DEFAULT_SLACK, ExpiryConfig};
pub use order::{Order, OrderId, OrderModify, Price, Quantity, Side, TimeInForce};
pub use snapshot::{BookDepth, LevelInfo};
pub use trade::{Trade, TradeInfo, TradeListener};
