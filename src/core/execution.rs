//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module runs a located [`TestSuite`] case by case on the calling thread
//! and aggregates the outcomes into an [`ExecutionResult`]. Every phase of a case
//! (fixture construction, set-up, body, tear-down) is guarded against panics, so
//! nothing raised inside a test ever escapes the run.
//!
//! 此模块在调用线程上逐个运行已定位的 [`TestSuite`]，并将结果聚合为
//! [`ExecutionResult`]。用例的每个阶段（fixture 构造、set-up、主体、tear-down）
//! 都有 panic 防护，因此测试内部抛出的任何问题都不会逃逸出本次运行。
//!
//! There is no timeout: a case that never returns blocks the run indefinitely.
//! 没有超时机制：永不返回的用例会无限期地阻塞本次运行。

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::{
    assertions::{AssertionFailure, is_assertion_failure},
    models::{CaseOutcome, ExecutionResult, TestCase, TestSuite},
    storage::{Datastore, StorageSlot},
};

/// Receives progress notifications while a suite runs.
///
/// 在套件运行期间接收进度通知。
pub trait RunObserver {
    /// Called once before the first case, with the freshly scheduled result.
    fn run_started(&mut self, _result: &ExecutionResult) {}

    fn case_started(&mut self, _case: &TestCase) {}

    /// Called after each case with the result as it stands after that case.
    fn case_finished(&mut self, _case: &TestCase, _outcome: &CaseOutcome, _result: &ExecutionResult) {}

    fn run_finished(&mut self, _result: &ExecutionResult, _elapsed: Duration) {}
}

/// Observer that ignores every notification.
impl RunObserver for () {}

/// Runs suites, optionally with a datastore override installed for the run.
#[derive(Default)]
pub struct Executor {
    storage_override: Option<(Arc<StorageSlot>, Arc<dyn Datastore>)>,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `provider` into `slot` for the duration of each run.
    pub fn with_storage_override(mut self, slot: Arc<StorageSlot>, provider: Arc<dyn Datastore>) -> Self {
        self.storage_override = Some((slot, provider));
        self
    }

    /// Executes every case of `suite` in order and returns the aggregated result.
    ///
    /// 按顺序执行 `suite` 中的每个用例并返回聚合结果。
    pub fn run(&self, suite: &TestSuite, observer: &mut dyn RunObserver) -> ExecutionResult {
        let _storage = self.storage_override.as_ref().map(|(slot, provider)| {
            tracing::debug!(store = provider.name(), "installing datastore override");
            slot.scoped(Arc::clone(provider))
        });

        let started = Instant::now();
        let mut result = ExecutionResult::scheduled(suite.len());
        observer.run_started(&result);

        for case in suite {
            result.start_case();
            observer.case_started(case);

            let outcome = run_case(case);
            tracing::debug!(case = %case.id(), outcome = %outcome.progress_char(), "case finished");

            result.record(case.description(), &outcome);
            observer.case_finished(case, &outcome, &result);
        }

        observer.run_finished(&result, started.elapsed());
        result
    }
}

/// Runs one case through set-up, body and tear-down. The first problem wins,
/// so each case contributes at most one error or failure.
fn run_case(case: &TestCase) -> CaseOutcome {
    let mut instance = match guarded(|| {
        let mut instance = case.instantiate();
        instance.set_up()?;
        Ok(instance)
    }) {
        Ok(instance) => instance,
        Err(problem) => return CaseOutcome::Errored(problem.into_detail()),
    };

    let body = guarded(|| instance.call());
    let tear_down = guarded(|| instance.tear_down());

    match (body, tear_down) {
        (Ok(()), Ok(())) => CaseOutcome::Passed,
        (Err(Problem::Assertion(detail)), _) => CaseOutcome::Failed(detail),
        (Err(Problem::Other(detail)), _) => CaseOutcome::Errored(detail),
        (Ok(()), Err(problem)) => CaseOutcome::Errored(problem.into_detail()),
    }
}

enum Problem {
    Assertion(String),
    Other(String),
}

impl Problem {
    fn into_detail(self) -> String {
        match self {
            Problem::Assertion(detail) | Problem::Other(detail) => detail,
        }
    }
}

fn guarded<T>(f: impl FnOnce() -> anyhow::Result<T>) -> Result<T, Problem> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) if is_assertion_failure(&error) => Err(Problem::Assertion(format!("{error:#}"))),
        Ok(Err(error)) => Err(Problem::Other(format!("{error:?}"))),
        Err(payload) => Err(classify_panic(payload)),
    }
}

/// `assert!`-family panics and `AssertionFailure` payloads are failures;
/// everything else is an error.
fn classify_panic(payload: Box<dyn Any + Send>) -> Problem {
    if let Some(failure) = payload.downcast_ref::<AssertionFailure>() {
        return Problem::Assertion(failure.message.clone());
    }

    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    };

    if message.starts_with("assertion") {
        Problem::Assertion(message)
    } else {
        Problem::Other(format!("panicked: {message}"))
    }
}
