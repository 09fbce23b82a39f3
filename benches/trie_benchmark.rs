//! Performance benchmarks for the trie core.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seqdedup::trie::Trie;

/// Deterministic pseudo-random 4-letter sequence generator (xorshift), so
/// benchmark input doesn't depend on an RNG crate.
struct SeqGen {
    state: u64,
}

impl SeqGen {
    fn new(seed: u64) -> Self {
        Self { state: seed | 1 }
    }

    fn next_seq(&mut self, len: usize) -> Vec<u8> {
        const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
        (0..len)
            .map(|_| {
                self.state ^= self.state << 13;
                self.state ^= self.state >> 7;
                self.state ^= self.state << 17;
                BASES[(self.state % 4) as usize]
            })
            .collect()
    }
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_insert");

    for count in [1_000usize, 10_000, 100_000].iter() {
        let mut gen = SeqGen::new(42);
        let sequences: Vec<Vec<u8>> = (0..*count).map(|_| gen.next_seq(36)).collect();

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("insert", count), count, |b, _| {
            b.iter(|| {
                let mut trie = Trie::new();
                for seq in &sequences {
                    let _ = black_box(trie.insert(seq));
                }
            });
        });
    }

    group.finish();
}

fn bench_pop_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_pop_cluster");

    for count in [1_000usize, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("drain", count), count, |b, &count| {
            b.iter_batched(
                || {
                    let mut gen = SeqGen::new(7);
                    let mut trie = Trie::new();
                    for _ in 0..count {
                        let _ = trie.insert(&gen.next_seq(36));
                    }
                    trie
                },
                |mut trie| {
                    while !trie.is_empty() {
                        let _ = black_box(trie.pop_cluster(1, false));
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_pop_cluster);
criterion_main!(benches);
