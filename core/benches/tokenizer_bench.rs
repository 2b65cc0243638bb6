use criterion::{criterion_group, criterion_main, Criterion};
use vsearch_core::tokenizer::{analyze, AnalyzerConfig};

const TEXT: &str = "In a hole in the ground there lived a hobbit. Not a nasty, dirty, wet hole, \
filled with the ends of worms and an oozy smell, nor yet a dry, bare, sandy hole with nothing \
in it to sit down on or to eat: it was a hobbit-hole, and that means comfort. \
Generalizations about relational conditionals are hopefully reasonably effective.";

fn bench_analyze(c: &mut Criterion) {
    let config = AnalyzerConfig::default();
    c.bench_function("analyze_paragraph", |b| b.iter(|| analyze(TEXT, &config)));
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
