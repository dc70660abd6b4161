//! # HTTP Server Module / HTTP 服务器模块
//!
//! Two endpoints:
//!
//! - `GET /test?package=..|module=..&format=html|plain` runs a suite. With `html`
//!   (the default) it returns the polling page once the run is over; with
//!   `plain` it streams the text report while the suite executes.
//! - `GET /testresult` returns the latest published state as the status payload.
//!
//! Suites execute on a blocking worker thread so polls are served while a run
//! is in progress. Discovery errors are reported inside a `200` response.
//!
//! 两个端点：
//!
//! - `GET /test?package=..|module=..&format=html|plain` 运行测试套件。使用 `html`
//!   （默认）时在运行结束后返回轮询页面；使用 `plain` 时在套件执行期间流式输出文本报告。
//! - `GET /testresult` 以状态载荷形式返回最新发布的状态。
//!
//! 套件在阻塞工作线程上执行，因此运行期间仍可响应轮询。发现错误在 `200` 响应中报告。

pub mod run;
pub mod store;

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};
use tokio_util::sync::CancellationToken;

use crate::core::{
    config::RunnerConfig,
    locator::Locator,
    models::RunState,
    registry::{PackageSource, Registry},
    storage::{self, StorageSlot},
};
use crate::infra::fs::DirectorySource;
use crate::reporting::{
    console::{ChannelWriter, TextReporter},
    html::render_shell,
    wire::render_status,
};

pub use run::{RunParams, run_request};
pub use store::ResultStore;

/// Shared state of the runner service.
///
/// 运行器服务的共享状态。
#[derive(Clone)]
pub struct AppState {
    pub locator: Arc<Locator>,
    pub store: Arc<ResultStore>,
    pub config: Arc<RunnerConfig>,
    pub storage: Arc<StorageSlot>,
}

impl AppState {
    /// Builds the state for `registry`, listing packages from `tests_root` when
    /// configured and from the registry otherwise. Runs isolate the process-wide
    /// storage slot.
    pub fn new(registry: Registry, config: RunnerConfig) -> Result<Self> {
        Self::with_storage(registry, config, storage::ambient())
    }

    /// Like [`AppState::new`], isolating `slot` instead of the process-wide one.
    pub fn with_storage(registry: Registry, config: RunnerConfig, slot: Arc<StorageSlot>) -> Result<Self> {
        let registry = Arc::new(registry);
        let packages: Arc<dyn PackageSource> = match config.tests_root_path()? {
            Some(root) => Arc::new(DirectorySource::new(root)),
            None => registry.clone() as Arc<dyn PackageSource>,
        };
        let locator = Locator::new(registry, packages).with_default_package(config.default_package.clone());

        Ok(Self {
            locator: Arc::new(locator),
            store: Arc::new(ResultStore::new()),
            config: Arc::new(config),
            storage: slot,
        })
    }
}

/// Routes of the runner service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/test", get(run_tests))
        .route("/testresult", get(test_result))
        .with_state(state)
}

async fn run_tests(State(state): State<AppState>, Query(params): Query<RunParams>) -> Response {
    tracing::info!(package = ?params.package, module = ?params.module, format = ?params.format, "run requested");

    if params.wants_plain() {
        return stream_plain(state, params);
    }

    let worker_state = state.clone();
    let worker = tokio::task::spawn_blocking(move || run_request(&worker_state, &params, &mut ()));
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "test run worker failed");
    }

    Html(render_shell(state.config.poll_interval_secs, &state.config.language).into_string()).into_response()
}

fn stream_plain(state: AppState, params: RunParams) -> Response {
    let (tx, rx) = mpsc::channel::<String>(64);

    tokio::task::spawn_blocking(move || {
        let mut reporter = TextReporter::new(ChannelWriter::new(tx));
        reporter.banner();
        if let RunState::ServiceError(message) = run_request(&state, &params, &mut reporter) {
            reporter.service_error(&message);
        }
    });

    let body = Body::from_stream(ReceiverStream::new(rx).map(Ok::<_, Infallible>));
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

async fn test_result(State(state): State<AppState>) -> Response {
    let published = state.store.snapshot();
    (
        [(header::CONTENT_TYPE, "application/json")],
        render_status(&published.state),
    )
        .into_response()
}

/// Serves the runner on `addr` until `shutdown` is cancelled.
pub async fn serve(state: AppState, addr: &str, shutdown: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "webunit listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Server error")
}
