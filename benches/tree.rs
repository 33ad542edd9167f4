//! Performance benchmarks for sufx
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sufx::tree::GeneralizedSuffixTree;

/// Deterministic pseudo-random text over a small alphabet
fn sample_text(len: usize, alphabet: &[u8], seed: u64) -> String {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            alphabet[(state % alphabet.len() as u64) as usize] as char
        })
        .collect()
}

fn sample_lines(count: usize, len: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "{}#{}",
                sample_text(len, b"abcdefghijklmnopqrstuvwxyz ", i as u64 + 1),
                i
            )
        })
        .collect()
}

fn build(strings: &[String]) -> GeneralizedSuffixTree {
    let mut tree = GeneralizedSuffixTree::new();
    for s in strings {
        tree.add(s).unwrap();
    }
    tree
}

fn bench_build_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_single");

    for len in [1_000, 10_000, 100_000] {
        // DNA-like text has long repeats and exercises suffix links
        let text = sample_text(len, b"acgt", 42);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| {
                let mut tree = GeneralizedSuffixTree::new();
                tree.add(black_box(text)).unwrap();
                tree
            })
        });
    }

    group.finish();
}

fn bench_build_many(c: &mut Criterion) {
    let lines = sample_lines(1_000, 40);

    c.bench_function("build_1000_lines", |b| b.iter(|| build(black_box(&lines))));
}

fn bench_queries(c: &mut Criterion) {
    let lines = sample_lines(1_000, 40);
    let tree = build(&lines);
    let pattern = &lines[500][10..16];

    let mut group = c.benchmark_group("query");

    group.bench_function("contains_hit", |b| b.iter(|| tree.contains(black_box(pattern))));
    group.bench_function("contains_miss", |b| {
        b.iter(|| tree.contains(black_box("zzzzzzzzqq")))
    });
    group.bench_function("contains_suffix", |b| {
        b.iter(|| tree.contains_suffix(black_box("#500")))
    });
    group.bench_function("starting_with_collect", |b| {
        b.iter(|| tree.starting_with(black_box("ab")).count())
    });
    group.bench_function("sources_containing", |b| {
        b.iter(|| tree.sources_containing(black_box("ab")))
    });

    group.finish();
}

fn bench_enumeration(c: &mut Criterion) {
    let lines = sample_lines(200, 40);
    let tree = build(&lines);

    c.bench_function("all_suffixes", |b| b.iter(|| tree.all().count()));
    c.bench_function("longest_common_substring", |b| {
        b.iter(|| tree.longest_common_substring())
    });
}

fn bench_compacted_append(c: &mut Criterion) {
    let lines = sample_lines(200, 40);

    c.bench_function("append_after_compact", |b| {
        b.iter(|| {
            let mut tree = build(&lines[..100]);
            tree.compact();
            for line in &lines[100..] {
                tree.add(black_box(line)).unwrap();
            }
            tree
        })
    });
}

criterion_group!(
    benches,
    bench_build_single,
    bench_build_many,
    bench_queries,
    bench_enumeration,
    bench_compacted_append,
);

criterion_main!(benches);
