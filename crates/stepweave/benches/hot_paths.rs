//! Hot Path Benchmarks
//!
//! Cache key derivation, store lookups, dependency grouping and a full
//! cached plan run.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;
use stepweave::{
    CacheStore, EngineConfig, ParallelEngine, Parameters, Step, ToolCache, canonical_key,
    group_steps,
};
use stepweave_testing::{MockToolRegistry, PlanBuilder};

fn parameters() -> Parameters {
    json!({
        "query": "async runtime",
        "sort": "stars",
        "filters": {"language": "rust", "archived": false},
        "limit": 10
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

/// Benchmark cache key derivation and store access
fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");
    group.throughput(Throughput::Elements(1));
    group.measurement_time(Duration::from_secs(5));

    let params = parameters();
    group.bench_function("canonical_key", |b| {
        b.iter(|| canonical_key(black_box("github_search"), black_box(&params)))
    });

    let store = CacheStore::new();
    for i in 0..1000 {
        store.set(format!("key_{i}"), i, Duration::from_secs(300));
    }
    group.bench_function("get_hit", |b| b.iter(|| store.get(black_box("key_500"))));
    group.bench_function("get_miss", |b| b.iter(|| store.get(black_box("absent"))));

    group.finish();
}

/// Benchmark dependency grouping over growing plans
fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");
    let tools = ["get_weather", "github_search", "get_news"];

    for size in [10usize, 100, 1000] {
        let steps: Vec<Step> = (0..size)
            .map(|i| {
                let description = if i % 7 == 0 {
                    format!("Summarize the above {i}")
                } else {
                    format!("Fetch item {i}")
                };
                Step::new(i as i64, description).with_tool(tools[i % tools.len()])
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("group_steps", size), &steps, |b, steps| {
            b.iter(|| group_steps(black_box(steps)).len())
        });
    }

    group.finish();
}

/// Benchmark a plan whose tool results are all cached
fn bench_cached_plan(c: &mut Criterion) {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => panic!("failed to build tokio runtime: {e}"),
    };

    let engine = ParallelEngine::new(
        Arc::new(MockToolRegistry::new().with_mock_tools()),
        Arc::new(ToolCache::new()),
        &EngineConfig::default(),
    );
    let plan = PlanBuilder::new()
        .tool_step("Weather", "get_weather", json!({"city": "Paris"}))
        .tool_step("Search", "github_search", json!({"query": "tokio"}))
        .tool_step("News", "get_news", json!({"topic": "rust"}))
        .step("Summarize the above")
        .build();
    rt.block_on(engine.execute_plan(&plan));

    c.bench_function("cached_plan_execution", |b| {
        b.to_async(&rt).iter(|| engine.execute_plan(black_box(&plan)))
    });
}

criterion_group!(benches, bench_cache, bench_grouping, bench_cached_plan);
criterion_main!(benches);
