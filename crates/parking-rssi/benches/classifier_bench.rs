//! Benchmarks for fingerprint classification and record encoding.
//!
//! Inputs are built from fixed arithmetic ramps so numbers are reproducible.
//!
//! Run with:
//!
//! ```bash
//! cargo bench -p parking-rssi
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parking_rssi::{KnnClassifier, LabeledSample, TrainingRecord, TrainingSet, VotePolicy};

fn fingerprint(seed: usize, dim: usize) -> Vec<f32> {
    (0..dim)
        .map(|i| -40.0 - ((seed * 7 + i * 13) % 60) as f32)
        .collect()
}

fn training_set(samples: usize, dim: usize) -> TrainingSet {
    let rows = (0..samples)
        .map(|s| LabeledSample::new(fingerprint(s, dim), (s % 11) as u32))
        .collect();
    TrainingSet::from_samples(rows, dim).unwrap_or_else(|_| TrainingSet::new(dim))
}

// ─────────────────────────────────────────────────────────────────────────────
// Prediction
// ─────────────────────────────────────────────────────────────────────────────

/// `predict` against growing training sets on a 6 x 4 grid.
fn bench_predict_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_scaling");
    let dim = 24;
    let query = fingerprint(9999, dim);

    for samples in [10_usize, 100, 1_000, 10_000] {
        let knn = KnnClassifier::new(5).with_training_set(training_set(samples, dim));
        group.bench_with_input(BenchmarkId::new("samples", samples), &samples, |b, _| {
            b.iter(|| {
                let _ = knn.predict(black_box(&query));
            });
        });
    }

    group.finish();
}

/// Majority voting against nearest-only on the same set.
fn bench_vote_policies(c: &mut Criterion) {
    let dim = 24;
    let set = training_set(1_000, dim);
    let query = fingerprint(4242, dim);

    for (name, vote) in [("nearest", VotePolicy::Nearest), ("majority", VotePolicy::Majority)] {
        let knn = KnnClassifier::new(15)
            .with_vote_policy(vote)
            .with_training_set(set.clone());
        c.bench_function(&format!("predict_1000_{name}"), |b| {
            b.iter(|| {
                let _ = knn.predict(black_box(&query));
            });
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Record encoding
// ─────────────────────────────────────────────────────────────────────────────

fn bench_record_round_trip(c: &mut Criterion) {
    let set = training_set(1_000, 24);
    let record = TrainingRecord::encode(&set);

    c.bench_function("record_encode_1000", |b| {
        b.iter(|| {
            let _ = TrainingRecord::encode(black_box(&set));
        });
    });
    c.bench_function("record_decode_1000", |b| {
        b.iter(|| {
            let _ = black_box(&record).decode();
        });
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Criterion registration
// ─────────────────────────────────────────────────────────────────────────────

criterion_group!(
    benches,
    bench_predict_scaling,
    bench_vote_policies,
    bench_record_round_trip,
);
criterion_main!(benches);
