//! Benchmarks for slab decoding and book assembly.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- decode_side
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use serum_slab::{AccountHeader, BookSide, DecodeConfig, OrderBook, Side, Slab};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{random_orders, reference_fixture, SlabFixture};

// ============================================================================
// HELPER FUNCTIONS - Deterministic account generation
// ============================================================================

/// An ask account with `count` orders and as many free slots, shuffled
fn ask_account(count: usize, seed: u64) -> Vec<u8> {
    SlabFixture::new(Side::Ask)
        .orders(random_orders(seed, count))
        .free_slots(count)
        .shuffled(seed)
        .encode()
}

// ============================================================================
// BENCHMARK: Single side
// ============================================================================

fn bench_decode_side(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_side");
    group.measurement_time(Duration::from_secs(5));

    let config = DecodeConfig::default();
    let walk_only = config.with_validate(false);

    for count in [32, 1_000, 10_000] {
        let bytes = ask_account(count, 42);
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("validate", count), &bytes, |b, bytes| {
            b.iter(|| BookSide::decode(black_box(bytes), Side::Ask, &config))
        });
        group.bench_with_input(BenchmarkId::new("walk_only", count), &bytes, |b, bytes| {
            b.iter(|| BookSide::decode(black_box(bytes), Side::Ask, &walk_only))
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Arena only
// ============================================================================

fn bench_arena(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena");

    let bytes = ask_account(10_000, 7);
    let body = match AccountHeader::split(&bytes) {
        Ok((_, body)) => body,
        Err(err) => panic!("fixture header: {err}"),
    };
    let slab = match Slab::decode(body) {
        Ok(slab) => slab,
        Err(err) => panic!("fixture slab: {err}"),
    };

    group.bench_function("classify_10k", |b| b.iter(|| Slab::decode(black_box(body))));
    group.bench_function("walk_10k", |b| b.iter(|| black_box(&slab).walk().map(|l| l.len())));
    group.bench_function("free_list_10k", |b| {
        b.iter(|| black_box(&slab).free_list().map(|f| f.len()))
    });
    group.bench_function("find_max_10k", |b| b.iter(|| black_box(&slab).find_max().is_ok()));

    group.finish();
}

// ============================================================================
// BENCHMARK: Full book
// ============================================================================

fn bench_order_book(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_book");

    let bids = reference_fixture(Side::Bid).encode();
    let asks = reference_fixture(Side::Ask).encode();
    let config = DecodeConfig::default();

    group.bench_function("decode_reference", |b| {
        b.iter(|| OrderBook::decode(black_box(&bids), black_box(&asks), &config))
    });

    if let Ok(book) = OrderBook::decode(&bids, &asks, &config) {
        group.bench_function("depth_10", |b| b.iter(|| book.depth(Side::Bid, black_box(10))));
        group.bench_function("fingerprint", |b| b.iter(|| book.fingerprint()));
    }

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(benches, bench_decode_side, bench_arena, bench_order_book);

criterion_main!(benches);
