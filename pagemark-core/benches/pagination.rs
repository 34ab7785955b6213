//! Pagination benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use pagemark_core::{build_layout, classify, PageMetrics};

fn sample_text() -> String {
    let mut text = String::new();
    for chapter in 1..=40 {
        text.push_str(&format!("# Chapter {chapter}\n\n"));
        for line in 0..200 {
            text.push_str(&format!("Line {line} of chapter {chapter} with some prose.\n"));
            if line % 7 == 0 {
                text.push('\n');
            }
        }
    }
    text
}

fn pagination_benchmark(c: &mut Criterion) {
    let text = sample_text();
    let metrics = PageMetrics::new(16, 720.0);

    c.bench_function("classify", |b| {
        b.iter(|| classify(std::hint::black_box(&text)))
    });
    c.bench_function("build_layout", |b| {
        b.iter(|| build_layout(std::hint::black_box(&text), metrics))
    });
}

criterion_group!(benches, pagination_benchmark);
criterion_main!(benches);
