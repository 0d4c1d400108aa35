//! Criterion benchmarks comparing relaxation with operator power.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use toroid_bench::{ring_profile, run_profile, square_profile};
use toroid_comm::Transport;
use toroid_engine::Strategy;

const STRATEGIES: [Strategy; 2] = [Strategy::Relaxation, Strategy::OperatorPower];

/// Benchmark: 4x4 grid, both strategies, growing step counts.
fn bench_square_4x4(c: &mut Criterion) {
    let mut group = c.benchmark_group("square_4x4");
    for t in [16u64, 256, 4096] {
        let profile = square_profile(4, 0.5, t, 42).unwrap();
        for strategy in STRATEGIES {
            group.bench_with_input(BenchmarkId::new(strategy.name(), t), &profile, |b, p| {
                b.iter(|| black_box(run_profile(p, strategy, Transport::Unbounded).unwrap()));
            });
        }
    }
    group.finish();
}

/// Benchmark: 16-cell ring, 1000 rounds, unbounded vs rendezvous inboxes.
fn bench_ring_transports(c: &mut Criterion) {
    let profile = ring_profile(16, 0.5, 1000).unwrap();
    let mut group = c.benchmark_group("ring_16_transport");
    for (name, transport) in [
        ("unbounded", Transport::Unbounded),
        ("rendezvous", Transport::RENDEZVOUS),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(run_profile(&profile, Strategy::Relaxation, transport).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_square_4x4, bench_ring_transports);
criterion_main!(benches);
