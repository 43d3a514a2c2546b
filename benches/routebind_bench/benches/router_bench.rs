//! Route matching benchmarks
//!
//! Matching is a linear scan in registration order, so cost grows with the
//! number of routes checked before the hit.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;
use routebind_core::{get, post, Router};

async fn noop() {}

fn build_router(resources: usize) -> Router {
    let mut router = Router::new();
    router.register("/", get(noop)).unwrap();
    for i in 0..resources {
        router
            .register(&format!("/resource{}", i), get(noop))
            .unwrap();
        router
            .register(&format!("/resource{}/{{id}}", i), get(noop))
            .unwrap();
        router
            .register(&format!("/resource{}/{{id}}", i), post(noop))
            .unwrap();
    }
    router
}

fn bench_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_route");

    let router = build_router(10);
    group.bench_function("static_root", |b| {
        b.iter(|| router.match_route(black_box(&Method::GET), black_box("/")))
    });
    group.bench_function("placeholder_last", |b| {
        b.iter(|| router.match_route(black_box(&Method::GET), black_box("/resource9/42")))
    });
    group.bench_function("not_found", |b| {
        b.iter(|| router.match_route(black_box(&Method::GET), black_box("/missing/1/2")))
    });
    group.bench_function("method_not_allowed", |b| {
        b.iter(|| router.match_route(black_box(&Method::DELETE), black_box("/resource5/1")))
    });

    group.finish();
}

fn bench_route_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_route_scaling");

    for resources in [1usize, 10, 50, 100] {
        let router = build_router(resources);
        let path = format!("/resource{}/42", resources - 1);
        group.bench_with_input(BenchmarkId::from_parameter(resources), &path, |b, path| {
            b.iter(|| router.match_route(&Method::GET, black_box(path)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_match, bench_route_count);
criterion_main!(benches);
