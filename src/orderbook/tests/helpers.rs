//! Shared constructors and logging setup for order book tests.

use std::sync::Once;

use crate::orderbook::order::{Order, OrderId, Price, Quantity, Side, TimeInForce};

static TRACING: Once = Once::new();

/// Install the fmt subscriber once so engine trace output is visible when
/// tests run with `RUST_LOG` set.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[allow(dead_code)]
pub fn gtc(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Order {
    Order::new(TimeInForce::GoodTillCancel, id, side, price, quantity)
}

#[allow(dead_code)]
pub fn gfd(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Order {
    Order::new(TimeInForce::GoodForDay, id, side, price, quantity)
}

#[allow(dead_code)]
pub fn fak(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Order {
    Order::new(TimeInForce::FillAndKill, id, side, price, quantity)
}

#[allow(dead_code)]
pub fn fok(id: OrderId, side: Side, price: Price, quantity: Quantity) -> Order {
    Order::new(TimeInForce::FillOrKill, id, side, price, quantity)
}
