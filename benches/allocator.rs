use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use meta_exchange::core::{FixedPoint8, Funds, OrderBook, RestingOrder, Side, Venue};
use meta_exchange::hot_path::allocate;

fn fp(units: i64) -> FixedPoint8 {
    FixedPoint8::from_raw(units * FixedPoint8::SCALE)
}

/// `venues` exchanges with `depth` levels per side, prices interleaved
/// across venues so the ranked walk alternates between them
fn build_venues(venues: usize, depth: usize) -> Vec<Venue> {
    (0..venues)
        .map(|v| {
            let asks = (0..depth)
                .map(|level| {
                    let price = fp(50_000 + (level * venues + v) as i64);
                    RestingOrder::limit(format!("ask-{}-{}", v, level), Side::Sell, FixedPoint8::from_raw(25_000_000), price)
                })
                .collect();
            let bids = (0..depth)
                .map(|level| {
                    let price = fp(49_999 - (level * venues + v) as i64);
                    RestingOrder::limit(format!("bid-{}-{}", v, level), Side::Buy, FixedPoint8::from_raw(25_000_000), price)
                })
                .collect();
            Venue::new(
                format!("exchange-{:02}", v),
                Funds::new(fp(50), fp(2_000_000)),
                OrderBook { bids, asks },
            )
        })
        .collect()
}

fn benchmark_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");

    for &(venues, depth) in &[(3usize, 50usize), (10, 200), (25, 1000)] {
        let snapshot = build_venues(venues, depth);
        group.throughput(Throughput::Elements((venues * depth) as u64));

        for side in [Side::Buy, Side::Sell] {
            group.bench_with_input(
                BenchmarkId::new(side.as_str(), format!("{}x{}", venues, depth)),
                &snapshot,
                |bench, snapshot| {
                    bench.iter_batched(
                        || snapshot.clone(),
                        |mut venues| black_box(allocate(&mut venues, side, fp(20))),
                        BatchSize::SmallInput,
                    )
                },
            );
        }
    }

    group.finish();
}

fn benchmark_exhaust_liquidity(c: &mut Criterion) {
    // Request exceeds the whole book: every order is visited
    let snapshot = build_venues(10, 500);

    c.bench_function("allocate_partial_fill_10x500", |bench| {
        bench.iter_batched(
            || snapshot.clone(),
            |mut venues| black_box(allocate(&mut venues, Side::Buy, fp(1_000_000))),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, benchmark_allocate, benchmark_exhaust_liquidity);
criterion_main!(benches);
