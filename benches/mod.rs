use criterion::{criterion_group, criterion_main};

mod order_flow;

use order_flow::register_benchmarks as register_order_flow_benchmarks;

// Define the benchmark groups
criterion_group!(benches, register_order_flow_benchmarks);

criterion_main!(benches);
