//! Parse and rule-set timing over the controller fixture.
//!
//! Run with: cargo bench --bench engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sharpscan::{Analyzer, SourceFile};

const VULNERABLE: &str = include_str!("../tests/fixtures/Vulnerable.cs");

/// Repeats the controller class `count` times inside one namespace.
fn controllers(count: usize) -> String {
    let body = VULNERABLE
        .split_once("namespace Shop.Controllers\n{\n")
        .map(|(_, rest)| rest.trim_end().trim_end_matches('}'))
        .unwrap_or(VULNERABLE);

    let mut source = String::from("namespace Shop.Controllers\n{\n");
    for idx in 0..count {
        source.push_str(&body.replace("OrdersController", &format!("OrdersController{idx}")));
    }
    source.push_str("}\n");
    source
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_fixture", |b| {
        b.iter(|| SourceFile::parse(black_box(VULNERABLE)).unwrap())
    });
}

fn bench_rules(c: &mut Criterion) {
    let analyzer = Analyzer::new().unwrap();
    let mut group = c.benchmark_group("analyze");

    for count in [1usize, 10, 50] {
        let source = controllers(count);
        let file = SourceFile::parse(source.as_str()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &file, |b, file| {
            b.iter(|| analyzer.analyze(black_box(file)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_rules);
criterion_main!(benches);
