//! Criterion benchmarks for the network engine.
//!
//! Run with: `cargo bench --bench train_bench`
//!
//! 1. **Forward pass** — per-activation cost on the 2-2-1 network
//! 2. **Single epoch** — four XOR examples, forward + backward each
//! 3. **Training to convergence** — the full loop from book weights

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use bpn::{training, Network, TrainOptions};

/// XOR-style example set used by every benchmark.
fn xor_examples() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
        vec![1.0, 0.0],
    ];
    let targets = vec![vec![0.1], vec![0.9], vec![0.1], vec![0.9]];
    (inputs, targets)
}

/// The textbook 2-2-1 network with momentum 0.95.
fn book_network() -> Network {
    Network::with_weights(
        vec![vec![vec![0.5, 0.4], vec![0.9, 1.0]], vec![vec![-1.2, 1.1]]],
        vec![vec![0.8, -0.1], vec![0.3]],
        0.1,
        0.95,
    )
}

fn bench_forward(c: &mut Criterion) {
    c.bench_function("forward_2_2_1", |b| {
        let mut network = book_network();
        b.iter(|| network.forward(black_box(&[1.0, 1.0])).unwrap());
    });

    c.bench_function("forward_16_32_8", |b| {
        let mut network = Network::seeded(&[16, 32, 8], 42, 0.1, 0.0);
        let input = vec![0.5; 16];
        b.iter(|| network.forward(black_box(&input)).unwrap());
    });
}

fn bench_epoch(c: &mut Criterion) {
    let (inputs, targets) = xor_examples();
    c.bench_function("epoch_xor_2_2_1", |b| {
        let mut network = book_network();
        b.iter(|| training::run_epoch(&mut network, black_box(&inputs), black_box(&targets)));
    });
}

fn bench_train_to_convergence(c: &mut Criterion) {
    let (inputs, targets) = xor_examples();
    let options = TrainOptions::default();
    c.bench_function("train_xor_to_convergence", |b| {
        b.iter_batched(
            book_network,
            |mut network| {
                training::train(
                    &mut network,
                    black_box(&inputs),
                    black_box(&targets),
                    1e-4,
                    &options,
                )
                .unwrap()
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_forward,
    bench_epoch,
    bench_train_to_convergence
);
criterion_main!(benches);
