//! Benchmark: reading one field of a large document, lazily and eagerly.
#![allow(missing_docs)]

use std::{fmt::Write, time::Duration};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lazyjson::{LazyNode, LazyValue, ParseOptions, path};

/// `{"records": [{"id": 0, "name": "record-0", "tags": [...], "body": "..."}, ...]}`
/// with `count` records.
fn make_payload(count: usize) -> String {
    let mut s = String::from(r#"{"records":["#);
    for i in 0..count {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r#"{{"id":{i},"name":"record-{i}","score":{},"tags":["a","b\n{i}"],"body":"{}"}}"#,
            i as f64 / 7.0,
            "x".repeat(64)
        )
        .unwrap();
    }
    s.push_str("]}");
    s
}

fn bench_single_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_field");

    for &count in &[10usize, 1_000, 10_000] {
        let payload = bytes::Bytes::from(make_payload(count));
        let target = count / 2;

        group.bench_with_input(BenchmarkId::new("lazy", count), &payload, |b, p| {
            b.iter(|| {
                let doc = LazyValue::parse(black_box(p.clone())).unwrap();
                black_box(doc.to_i64_at(&path!["records", target, "id"]).unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("lazy_unvalidated", count), &payload, |b, p| {
            let options = ParseOptions {
                validate: false,
                ..Default::default()
            };
            b.iter(|| {
                let doc = LazyValue::parse_with(black_box(p.clone()), options).unwrap();
                black_box(doc.to_i64_at(&path!["records", target, "id"]).unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("materialize", count), &payload, |b, p| {
            b.iter(|| {
                let doc = LazyValue::parse(black_box(p.clone())).unwrap();
                black_box(doc.object().unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("serde_json", count), &payload, |b, p| {
            b.iter(|| {
                let v: serde_json::Value = serde_json::from_slice(black_box(p)).unwrap();
                black_box(v["records"][target]["id"].as_i64())
            });
        });
    }
    group.finish();
}

fn bench_repeated_reads(c: &mut Criterion) {
    let payload = make_payload(1_000);
    let doc = LazyValue::parse(payload).unwrap();

    c.bench_function("repeated_reads/indexed", |b| {
        b.iter(|| {
            let records = doc.get_key("records").unwrap();
            let total: f64 = records
                .iter()
                .map(|r| r.to_f64_at(&path!["score"]).unwrap())
                .sum();
            black_box(total)
        });
    });

    c.bench_function("repeated_reads/escaped_strings", |b| {
        b.iter(|| {
            let records = doc.get_key("records").unwrap();
            let len: usize = records
                .iter()
                .map(|r| r.to_str_at(&path!["tags", 1]).unwrap().map_or(0, |s| s.len()))
                .sum();
            black_box(len)
        });
    });
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_single_field, bench_repeated_reads }
criterion_main!(benches);
