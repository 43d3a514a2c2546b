//! Parameter binding benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use http::Method;
use routebind_core::{bind, get, ParamType, QueryValues, Router};

async fn noop() {}

fn items_router() -> Router {
    let mut router = Router::new();
    router
        .register(
            "/items/{item_id}",
            get(noop)
                .query("needy", ParamType::Str)
                .query_default("skip", ParamType::Int, 0)
                .query("limit", ParamType::optional(ParamType::Int)),
        )
        .unwrap();
    router
}

fn bench_query_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_parse");

    group.bench_function("three_pairs", |b| {
        b.iter(|| QueryValues::parse(black_box(Some("needy=a&skip=5&limit=10"))))
    });
    group.bench_function("encoded", |b| {
        b.iter(|| QueryValues::parse(black_box(Some("needy=hello%20world&skip=5"))))
    });

    group.finish();
}

fn bench_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind");
    let router = items_router();
    let matched = router.match_route(&Method::GET, "/items/42").unwrap();

    let defaults = QueryValues::parse(Some("needy=yes")).unwrap();
    group.bench_function("defaults_applied", |b| {
        b.iter(|| bind(matched.route, &matched.params, black_box(&defaults)))
    });

    let full = QueryValues::parse(Some("needy=a&skip=5&limit=10")).unwrap();
    group.bench_function("all_supplied", |b| {
        b.iter(|| bind(matched.route, &matched.params, black_box(&full)))
    });

    let invalid = QueryValues::parse(Some("skip=abc&limit=many")).unwrap();
    group.bench_function("all_invalid", |b| {
        b.iter(|| bind(matched.route, &matched.params, black_box(&invalid)))
    });

    group.finish();
}

fn bench_request(c: &mut Criterion) {
    let router = items_router();

    c.bench_function("match_and_bind", |b| {
        b.iter(|| {
            let matched = router
                .match_route(&Method::GET, black_box("/items/42"))
                .unwrap();
            let query = QueryValues::parse(black_box(Some("needy=yes&skip=3"))).unwrap();
            bind(matched.route, &matched.params, &query)
        })
    });
}

criterion_group!(benches, bench_query_parse, bench_bind, bench_request);
criterion_main!(benches);
