//! Benchmarks for the order flow hot paths: resting adds, crossing adds,
//! cancellation and depth snapshots.

use criterion::{BatchSize, Criterion};
use matchbook::{Order, OrderBook, Side, TimeInForce};

const ORDERS: u64 = 1_000;

fn seeded_book() -> OrderBook {
    let book = OrderBook::new("BENCH");
    for id in 0..ORDERS {
        let side = if id % 2 == 0 { Side::Buy } else { Side::Sell };
        let price = if side == Side::Buy {
            90 + (id % 10) as u128
        } else {
            101 + (id % 10) as u128
        };
        book.add_order(Order::new(
            TimeInForce::GoodTillCancel,
            id + 1,
            side,
            price,
            10,
        ));
    }
    book
}

pub fn register_benchmarks(c: &mut Criterion) {
    // Engine trace output is off unless RUST_LOG enables it, so timed
    // sections stay unaffected in normal runs.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut group = c.benchmark_group("order_flow");

    group.bench_function("add_resting_orders", |b| {
        b.iter_batched(
            || OrderBook::new("BENCH"),
            |book| {
                for id in 0..ORDERS {
                    let side = if id % 2 == 0 { Side::Buy } else { Side::Sell };
                    let price = if side == Side::Buy { 90 } else { 110 };
                    book.add_order(Order::new(
                        TimeInForce::GoodTillCancel,
                        id + 1,
                        side,
                        price,
                        10,
                    ));
                }
                book
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("add_crossing_orders", |b| {
        b.iter_batched(
            seeded_book,
            |book| {
                for id in 0..100u64 {
                    book.add_order(Order::new(
                        TimeInForce::GoodTillCancel,
                        ORDERS + id + 1,
                        Side::Buy,
                        110,
                        20,
                    ));
                }
                book
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("cancel_resident_orders", |b| {
        b.iter_batched(
            seeded_book,
            |book| {
                for id in 1..=ORDERS {
                    book.cancel_order(id);
                }
                book
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("depth_snapshot", |b| {
        let book = seeded_book();
        b.iter(|| book.level_infos())
    });

    group.finish();
}
