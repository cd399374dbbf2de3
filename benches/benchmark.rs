// Performance benchmarks for code comparison and pair aggregation
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vidsim::prelude::*;

const FINGERPRINT_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn random_hash(rng: &mut StdRng, bits: usize) -> String {
    (0..bits)
        .map(|_| if rng.random_bool(0.5) { '1' } else { '0' })
        .collect()
}

fn random_fingerprint(rng: &mut StdRng, min_len: usize, max_len: usize) -> String {
    let len = rng.random_range(min_len..=max_len);
    (0..len)
        .map(|_| FINGERPRINT_ALPHABET[rng.random_range(0..FINGERPRINT_ALPHABET.len())] as char)
        .collect()
}

fn generate_items(n: usize) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            Item::new(i, format!("{}.mp4", i))
                .with_code("hash", random_hash(&mut rng, 64))
                .with_code("fingerprint", random_fingerprint(&mut rng, 200, 400))
        })
        .collect()
}

fn benchmark_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let mut rng = StdRng::seed_from_u64(7);

    let a = random_hash(&mut rng, 64);
    let b = random_hash(&mut rng, 64);
    group.bench_function("hamming_64", |bench| {
        bench.iter(|| compare(black_box(&a), black_box(&b)))
    });

    for len in [100, 400, 1600].iter() {
        let a = random_fingerprint(&mut rng, *len, *len);
        let b = random_fingerprint(&mut rng, *len + 1, *len + 1);
        group.bench_with_input(BenchmarkId::new("bigram", len), len, |bench, _| {
            bench.iter(|| compare(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn benchmark_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    group.sample_size(10);

    let aggregator = Aggregator::new(SignalSchema::default()).unwrap();
    for size in [10, 50, 100].iter() {
        let items = generate_items(*size);
        group.bench_with_input(BenchmarkId::new("two_signals", size), size, |bench, _| {
            bench.iter(|| aggregator.aggregate(black_box(&items)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_compare, benchmark_aggregate);
criterion_main!(benches);
