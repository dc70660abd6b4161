use criterion::{Criterion, criterion_group, criterion_main};
use std::sync::Arc;
use tokio::runtime::Runtime;
use webunit::assertions::check_eq;
use webunit::core::config::RunnerConfig;
use webunit::core::execution::Executor;
use webunit::core::locator::{Locator, Selector};
use webunit::core::registry::PackageSource;
use webunit::models::RunState;
use webunit::reporting::render_status;
use webunit::server::{AppState, RunParams, run_request};
use webunit::{Registry, TestFixture, TestModule, TestType};

#[derive(Default)]
struct Counter {
    value: u32,
}

impl TestFixture for Counter {
    fn set_up(&mut self) -> anyhow::Result<()> {
        self.value = 1;
        Ok(())
    }
}

fn bench_registry() -> Registry {
    let counting = TestType::of::<Counter>("CountingTest")
        .method("test_increments", |c| {
            c.value += 1;
            check_eq(c.value, 2)
        })
        .method("test_mismatch", |c| check_eq(c.value, 0))
        .method("test_error", |_| anyhow::bail!("unavailable"))
        .build();
    Registry::new().with_modules([TestModule::new("bench.test_counting").with_type(counting)])
}

fn bench_execute_suite(c: &mut Criterion) {
    let registry = Arc::new(bench_registry());
    let suite = Locator::new(registry.clone(), registry as Arc<dyn PackageSource>)
        .locate(&Selector::Package("bench".to_string()))
        .unwrap();
    let executor = Executor::new();

    c.bench_function("execute_suite", |b| {
        b.iter(|| executor.run(&suite, &mut ()));
    });
}

fn bench_render_status(c: &mut Criterion) {
    let registry = Arc::new(bench_registry());
    let suite = Locator::new(registry.clone(), registry as Arc<dyn PackageSource>)
        .locate(&Selector::Package("bench".to_string()))
        .unwrap();
    let state = RunState::Result(Executor::new().run(&suite, &mut ()));

    c.bench_function("render_status", |b| {
        b.iter(|| render_status(&state));
    });
}

fn bench_run_request(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let config = RunnerConfig {
        default_package: "bench".to_string(),
        isolate_storage: false,
        ..RunnerConfig::default()
    };
    let state = AppState::new(bench_registry(), config).unwrap();
    let params = RunParams::default();

    c.bench_function("run_request", |b| {
        b.to_async(&rt).iter(|| {
            let state = state.clone();
            let params = params.clone();
            async move {
                tokio::task::spawn_blocking(move || run_request(&state, &params, &mut ()))
                    .await
                    .unwrap()
            }
        });
    });
}

criterion_group!(benches, bench_execute_suite, bench_render_status, bench_run_request);
criterion_main!(benches);
