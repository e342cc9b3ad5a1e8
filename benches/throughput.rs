//! Throughput benchmarks for batch signing.
//!
//! Run with: `cargo bench --bench throughput`

use std::sync::Arc;

use alloy_primitives::U256;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use bigdecimal::BigDecimal;

use reya_core::config::TradingConfig;
use reya_core::signing::{
    MonotonicNonce, NonceSource, OrderRequestAssembler, OrderSigner, TypedDataBuilder,
};
use reya_core::types::MarketOrderIntent;

// Test private key (DO NOT USE IN PRODUCTION)
const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn config() -> TradingConfig {
    TradingConfig::new(1729).with_private_key(TEST_PRIVATE_KEY)
}

/// Generate random market order intents.
fn generate_intents(count: usize) -> Vec<MarketOrderIntent> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let lots: i64 = rng.gen_range(1..10_000);
            let size = if rng.gen_bool(0.5) { lots } else { -lots };
            MarketOrderIntent {
                account_id: rng.gen_range(1..100_000),
                market_id: rng.gen_range(1..100),
                size: BigDecimal::new(size.into(), 3),
                price: BigDecimal::new(rng.gen_range(1_000_000i64..100_000_000).into(), 2),
                reduce_only: rng.gen_bool(0.2),
            }
        })
        .collect()
}

/// Benchmark sequential batch signing.
fn bench_batch_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_signing");
    let config = config();
    let signer = OrderSigner::from_config(&config).unwrap();
    let builder = TypedDataBuilder::from_config(&config, signer.address()).unwrap();

    for count in [10, 100, 1000].iter() {
        let intents = generate_intents(*count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("sequential", count), &intents, |b, intents| {
            b.iter(|| {
                let signatures: Vec<_> = intents
                    .iter()
                    .enumerate()
                    .map(|(i, intent)| {
                        let material = builder
                            .build_gateway_market_order(intent, U256::from(i), 1_732_000_060)
                            .unwrap();
                        signer.sign(&material).unwrap()
                    })
                    .collect();
                black_box(signatures)
            })
        });
    }

    group.finish();
}

/// Benchmark parallel request assembly using rayon.
fn bench_parallel_assembly(c: &mut Criterion) {
    use rayon::prelude::*;

    let mut group = c.benchmark_group("parallel_assembly");
    let assembler = OrderRequestAssembler::from_config(&config()).unwrap();

    for count in [100, 1000].iter() {
        let intents = generate_intents(*count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("market_order", count), &intents, |b, intents| {
            b.iter(|| {
                let requests: Vec<_> = intents
                    .par_iter()
                    .map(|intent| assembler.market_order(intent).unwrap())
                    .collect();
                black_box(requests)
            })
        });
    }

    group.finish();
}

/// Benchmark contended nonce generation.
fn bench_nonce_contention(c: &mut Criterion) {
    use rayon::prelude::*;

    let mut group = c.benchmark_group("nonce_contention");
    let nonces = Arc::new(MonotonicNonce::default());

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("monotonic_10k", |b| {
        b.iter(|| {
            let max = (0..10_000)
                .into_par_iter()
                .map(|_| nonces.next_nonce())
                .max();
            black_box(max)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_batch_signing,
    bench_parallel_assembly,
    bench_nonce_contention,
);

criterion_main!(benches);
