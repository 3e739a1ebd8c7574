use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gavel_core::json::extract_json;
use gavel_core::judge::normalize_scores;

fn make_scores(n: u32) -> BTreeMap<String, u32> {
    (0..n).map(|i| (format!("criterion-{i}"), i % 11)).collect()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_scores");

    for n in [2u32, 5, 20] {
        let scores = make_scores(n);
        group.bench_function(format!("criteria={n}"), |b| {
            b.iter(|| normalize_scores(black_box(&scores)))
        });
    }

    group.finish();
}

fn bench_extract_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_json");

    let clean = r#"{"reasoning":"r","scores":{"clarity":8,"accuracy":6},"verdict":"ok"}"#;
    group.bench_function("clean", |b| b.iter(|| extract_json(black_box(clean))));

    let noisy = format!(
        "Sure! Here is my evaluation as requested:\n\n```json\n{clean}\n```\n\nLet me know if you need anything else."
    );
    group.bench_function("noisy", |b| b.iter(|| extract_json(black_box(&noisy))));

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_extract_json);
criterion_main!(benches);
