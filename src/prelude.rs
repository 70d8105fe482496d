//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook::prelude::*;
//! ```

// Core book types
pub use crate::orderbook::OrderBook;
pub use crate::orderbook::OrderBookError;

// Order model
pub use crate::orderbook::order::{
    Order, OrderId, OrderModify, Price, Quantity, Side, TimeInForce,
};

// Trade types
pub use crate::orderbook::trade::{Trade, TradeInfo, TradeListener};

// Depth snapshot types
pub use crate::orderbook::snapshot::{BookDepth, LevelInfo};

// Expiry configuration
pub use crate::orderbook::expiry::{DEFAULT_CUTOFF_HOUR, DEFAULT_SLACK, ExpiryConfig};

// Utility functions
pub use crate::utils::current_time_millis;
