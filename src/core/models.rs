//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the runner:
//! runnable test cases, the suites built from them, per-case outcomes and the
//! aggregated execution result that is published to polling clients.
//!
//! 此模块定义了整个运行器中使用的核心数据结构：
//! 可运行的测试用例、由其构成的测试套件、单个用例的结果，
//! 以及发布给轮询客户端的聚合执行结果。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::core::registry::CaseInstance;

/// Produces a fresh fixture instance bound to one test method.
/// 生成绑定到某个测试方法的全新 fixture 实例。
pub type Instantiator = Arc<dyn Fn() -> Box<dyn CaseInstance> + Send + Sync>;

/// A single runnable test case, expanded from one test method of a test type.
///
/// 单个可运行的测试用例，由测试类型中的一个测试方法展开而来。
#[derive(Clone)]
pub struct TestCase {
    /// Dotted name of the module the case was discovered in / 发现该用例的模块的点分名称
    pub module: String,
    /// Name of the test type, e.g. `GuestbookTest` / 测试类型名称，例如 `GuestbookTest`
    pub type_name: String,
    /// Name of the test method, e.g. `test_sign` / 测试方法名称，例如 `test_sign`
    pub method: String,
    /// Optional doc text declared for the method / 为该方法声明的可选文档文本
    pub doc: Option<String>,
    instantiate: Instantiator,
}

impl TestCase {
    pub fn new(
        module: impl Into<String>,
        type_name: impl Into<String>,
        method: impl Into<String>,
        doc: Option<String>,
        instantiate: Instantiator,
    ) -> Self {
        Self {
            module: module.into(),
            type_name: type_name.into(),
            method: method.into(),
            doc,
            instantiate,
        }
    }

    /// Fully qualified identifier: `module.Type.method`.
    pub fn id(&self) -> String {
        format!("{}.{}.{}", self.module, self.type_name, self.method)
    }

    /// The declared summary (first non-empty doc line), or `method (module.Type)`.
    ///
    /// 声明的摘要（文档的第一个非空行），否则为 `method (module.Type)`。
    pub fn description(&self) -> String {
        self.doc
            .as_deref()
            .and_then(|doc| doc.lines().map(str::trim).find(|line| !line.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} ({}.{})", self.method, self.module, self.type_name))
    }

    /// Creates a new, not yet set up, instance of this case.
    pub fn instantiate(&self) -> Box<dyn CaseInstance> {
        (self.instantiate)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &self.id())
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// An ordered, append-only collection of test cases.
/// A suite is built fresh for every run request and dropped after execution.
///
/// 有序且只允许追加的测试用例集合。
/// 每次运行请求都会重新构建套件，执行后即丢弃。
#[derive(Debug, Clone, Default)]
pub struct TestSuite {
    cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, case: TestCase) {
        self.cases.push(case);
    }

    /// Appends every case of `other`, keeping its order.
    pub fn extend(&mut self, other: TestSuite) {
        self.cases.extend(other.cases);
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Identifiers of all cases, in execution order.
    pub fn ids(&self) -> Vec<String> {
        self.cases.iter().map(TestCase::id).collect()
    }
}

impl<'a> IntoIterator for &'a TestSuite {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// The outcome of a single test case.
/// 单个测试用例的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    /// The case ran to completion without problems.
    /// 用例顺利运行完成。
    Passed,
    /// An assertion did not hold. Carries the raw detail text.
    /// 断言不成立。携带原始详情文本。
    Failed(String),
    /// Any other problem, including set-up and tear-down errors.
    /// 其他任何问题，包括 set-up 与 tear-down 错误。
    Errored(String),
}

impl CaseOutcome {
    /// The progress marker printed by the text reporter.
    pub fn progress_char(&self) -> char {
        match self {
            CaseOutcome::Passed => '.',
            CaseOutcome::Failed(_) => 'F',
            CaseOutcome::Errored(_) => 'E',
        }
    }
}

/// A `(description, detail)` pair recorded for a failed or errored case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub description: String,
    pub detail: String,
}

/// Aggregated counts and failure details of one suite execution.
///
/// Invariants: `runs <= total` and `errors.len() + failures.len() <= runs`.
///
/// 一次套件执行的聚合计数与失败详情。
/// 不变量：`runs <= total` 且 `errors.len() + failures.len() <= runs`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Number of cases actually started / 实际开始执行的用例数
    pub runs: usize,
    /// Number of cases scheduled / 计划执行的用例数
    pub total: usize,
    /// Unexpected errors, in execution order / 意外错误，按执行顺序排列
    pub errors: Vec<FailureDetail>,
    /// Assertion failures, in execution order / 断言失败，按执行顺序排列
    pub failures: Vec<FailureDetail>,
}

impl ExecutionResult {
    /// A result for a suite of `total` cases, none of which has started yet.
    pub fn scheduled(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Marks one more case as started.
    pub fn start_case(&mut self) {
        self.runs += 1;
    }

    /// Records the outcome of the case most recently started.
    pub fn record(&mut self, description: String, outcome: &CaseOutcome) {
        match outcome {
            CaseOutcome::Passed => {}
            CaseOutcome::Failed(detail) => self.failures.push(FailureDetail {
                description,
                detail: detail.clone(),
            }),
            CaseOutcome::Errored(detail) => self.errors.push(FailureDetail {
                description,
                detail: detail.clone(),
            }),
        }
    }

    /// `true` when no case failed or errored.
    pub fn was_successful(&self) -> bool {
        self.errors.is_empty() && self.failures.is_empty()
    }
}

/// The value published to pollers. Each published value is immutable; a new run
/// replaces it wholesale.
///
/// 发布给轮询者的值。每个已发布的值都是不可变的；新的运行会整体替换它。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// No run has been requested since the process started.
    /// 自进程启动以来尚未请求任何运行。
    Idle,
    /// A run is in flight or complete; the result reflects every finished case.
    /// 运行正在进行或已完成；结果反映所有已结束的用例。
    Result(ExecutionResult),
    /// Discovery failed; no result exists for this run.
    /// 发现阶段失败；本次运行没有结果。
    ServiceError(String),
}
