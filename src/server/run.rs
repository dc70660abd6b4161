//! # Run Request Module / 运行请求模块
//!
//! One run request end to end: take a ticket, locate the suite, execute it with
//! storage isolation, and publish the state after every case.
//!
//! 一次完整的运行请求：领取票据、定位套件、在存储隔离下执行，
//! 并在每个用例结束后发布状态。

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::core::{
    execution::{Executor, RunObserver},
    locator::Selector,
    models::{CaseOutcome, ExecutionResult, RunState, TestCase},
    storage::MemoryDatastore,
};
use crate::server::{
    AppState,
    store::{ResultStore, RunTicket},
};

/// Query parameters of `GET /test`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunParams {
    pub package: Option<String>,
    pub module: Option<String>,
    pub format: Option<String>,
}

impl RunParams {
    /// `true` only for `format=plain`; anything else renders HTML.
    pub fn wants_plain(&self) -> bool {
        self.format.as_deref() == Some("plain")
    }
}

/// Publishes every intermediate result and forwards notifications to `inner`.
struct Publishing<'a, 'o> {
    store: &'a ResultStore,
    ticket: &'a RunTicket,
    inner: &'a mut (dyn RunObserver + 'o),
}

impl RunObserver for Publishing<'_, '_> {
    fn run_started(&mut self, result: &ExecutionResult) {
        self.store.publish(self.ticket, RunState::Result(result.clone()));
        self.inner.run_started(result);
    }

    fn case_started(&mut self, case: &TestCase) {
        self.inner.case_started(case);
    }

    fn case_finished(&mut self, case: &TestCase, outcome: &CaseOutcome, result: &ExecutionResult) {
        self.store.publish(self.ticket, RunState::Result(result.clone()));
        self.inner.case_finished(case, outcome, result);
    }

    fn run_finished(&mut self, result: &ExecutionResult, elapsed: Duration) {
        self.inner.run_finished(result, elapsed);
    }
}

/// Runs the suite selected by `params` on the calling thread and returns the
/// final state, which has also been published to the store.
///
/// 在调用线程上运行由 `params` 选定的套件并返回最终状态，
/// 该状态同时已发布到存储中。
pub fn run_request(state: &AppState, params: &RunParams, observer: &mut dyn RunObserver) -> RunState {
    let ticket = state.store.begin_run();
    let selector = Selector::from_params(
        params.package.as_deref(),
        params.module.as_deref(),
        state.locator.default_package(),
    );

    let suite = match selector.and_then(|selector| state.locator.locate(&selector)) {
        Ok(suite) => suite,
        Err(e) => {
            let message = e.to_string();
            tracing::warn!(run = ticket.id(), error = %message, "test discovery failed");
            let failed = RunState::ServiceError(message);
            state.store.publish(&ticket, failed.clone());
            return failed;
        }
    };

    tracing::info!(run = ticket.id(), cases = suite.len(), "test run started");

    let mut executor = Executor::new();
    if state.config.isolate_storage {
        let provider = Arc::new(MemoryDatastore::new(format!("webunit-run-{}", ticket.id())));
        executor = executor.with_storage_override(Arc::clone(&state.storage), provider);
    }

    let mut publishing = Publishing {
        store: &state.store,
        ticket: &ticket,
        inner: observer,
    };
    let result = executor.run(&suite, &mut publishing);

    tracing::info!(
        run = ticket.id(),
        runs = result.runs,
        errors = result.errors.len(),
        failures = result.failures.len(),
        "test run finished"
    );
    RunState::Result(result)
}
