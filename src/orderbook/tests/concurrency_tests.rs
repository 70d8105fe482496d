//! Tests for the single-writer discipline under concurrent callers and for
//! shutdown behavior.

#[cfg(test)]
mod tests {
    use crate::orderbook::order::{Order, Side, TimeInForce};
    use crate::orderbook::tests::helpers::init_tracing;
    use crate::OrderBook;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn concurrent_adds_and_cancels_serialize_cleanly() {
        init_tracing();
        let book = OrderBook::new("CONC");
        let writers = 4;
        let per_writer = 250u64;

        thread::scope(|scope| {
            for writer in 0..writers {
                let book = &book;
                scope.spawn(move || {
                    let base = writer * per_writer + 1;
                    for offset in 0..per_writer {
                        let id = base + offset;
                        let side = if id % 2 == 0 { Side::Buy } else { Side::Sell };
                        // Keep the sides from crossing so residency is predictable
                        let price = if side == Side::Buy {
                            90 + (id % 10) as u128
                        } else {
                            110 + (id % 10) as u128
                        };
                        book.add_order(Order::new(
                            TimeInForce::GoodTillCancel,
                            id,
                            side,
                            price,
                            1 + id % 5,
                        ));
                        if id % 3 == 0 {
                            book.cancel_order(id);
                        }
                    }
                });
            }
        });

        let depth = book.level_infos();
        let counted: usize = depth
            .bids
            .iter()
            .chain(depth.asks.iter())
            .map(|level| level.order_count)
            .sum();
        assert_eq!(book.len(), counted);

        // Every id is either resident or cancelled, never duplicated
        let expected = (1..=writers * per_writer).filter(|id| id % 3 != 0).count();
        assert_eq!(book.len(), expected);
    }

    #[test]
    fn concurrent_crossing_traffic_stays_consistent() {
        init_tracing();
        let book = OrderBook::new("CROSS");

        thread::scope(|scope| {
            let buyer = &book;
            scope.spawn(move || {
                for i in 0..500u64 {
                    buyer.add_order(Order::new(
                        TimeInForce::GoodTillCancel,
                        i + 1,
                        Side::Buy,
                        100,
                        2,
                    ));
                }
            });

            let seller = &book;
            scope.spawn(move || {
                for i in 0..500u64 {
                    seller.add_order(Order::new(
                        TimeInForce::GoodTillCancel,
                        i + 10_001,
                        Side::Sell,
                        100,
                        2,
                    ));
                }
            });
        });

        // Equal volume at one price must fully cross
        assert!(book.is_empty());
        let depth = book.level_infos();
        assert!(depth.bids.is_empty());
        assert!(depth.asks.is_empty());
    }

    #[test]
    fn drop_joins_the_expiry_worker_promptly() {
        let started = Instant::now();
        {
            let book = OrderBook::new("SHUTDOWN");
            book.add_order(Order::new(
                TimeInForce::GoodForDay,
                1,
                Side::Buy,
                100,
                1,
            ));
        }
        // The worker's timed wait runs out at the next daily cutoff; the
        // shutdown notify must interrupt it immediately.
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
