//! Template engine baseline benchmarks
//!
//! Establishes compile and resolve baselines for the parse-once,
//! execute-many usage pattern.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sqlweave_template::{compile, interpolate, Bindings};

fn bench_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_compilation");

    group.bench_function("plain_text", |b| {
        b.iter(|| compile(black_box("SELECT id, name, email FROM users WHERE active = 1")))
    });

    group.bench_function("mixed_placeholders", |b| {
        b.iter(|| {
            compile(black_box(
                "INSERT INTO users (id, name, joined) VALUES ({id}, ${name}, #{joined})",
            ))
        })
    });

    group.bench_function("timestamp_literal", |b| {
        b.iter(|| compile(black_box("WHERE at BETWEEN #9.2.2019# AND #1999-7-12 10:01pm#")))
    });

    // Placeholder-count scaling
    for &count in &[1, 5, 10, 25] {
        let mut template = String::from("SELECT * FROM t WHERE ");
        for i in 0..count {
            if i > 0 {
                template.push_str(" AND ");
            }
            template.push_str(&format!("c{} = {{v{}}}", i, i));
        }
        group.bench_with_input(
            BenchmarkId::new("placeholders", count),
            &template,
            |b, template| b.iter(|| compile(black_box(template))),
        );
    }

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_resolution");

    let plan = compile("UPDATE users SET name = ${name}, score = {score} WHERE id = {id}")
        .expect("benchmark template compiles");
    let bindings = Bindings::new()
        .with("name", "ada")
        .with("score", 99i64)
        .with("id", 7i64);

    group.bench_function("reused_plan", |b| {
        b.iter(|| plan.resolve(black_box(&bindings)))
    });

    group.bench_function("compile_and_resolve", |b| {
        b.iter(|| {
            interpolate(
                black_box("UPDATE users SET name = ${name}, score = {score} WHERE id = {id}"),
                black_box(&bindings),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_compilation, bench_resolution);
criterion_main!(benches);
