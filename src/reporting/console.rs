//! # Text Reporting Module / 文本报告模块
//!
//! This module renders a run as human-readable text while it executes: one
//! progress character per case, then a block per error and failure, then the
//! totals. The same reporter feeds the `format=plain` HTTP response and the
//! `run` console command.
//!
//! 此模块在运行期间将其渲染为人类可读的文本：每个用例一个进度字符，
//! 然后每个错误和失败各一个区块，最后是总计。同一个报告器既用于
//! `format=plain` 的 HTTP 响应，也用于 `run` 控制台命令。
//!
//! ## Output Format / 输出格式
//! ```text
//! ====================
//! WebUnit Test Results
//! ====================
//!
//! ..F
//! ======================================================================
//! FAIL: test_sign (test.test_guestbook.GuestbookTest)
//! ----------------------------------------------------------------------
//! "a" != "b"
//!
//! ----------------------------------------------------------------------
//! Ran 3 tests in 0.002s
//!
//! FAILED (failures=1)
//! ```

use colored::*;
use std::io::{self, Write};
use std::time::Duration;

use crate::core::execution::RunObserver;
use crate::core::models::{CaseOutcome, ExecutionResult, FailureDetail, TestCase};

/// Banner written before any result.
pub const BANNER: &str = "====================\nWebUnit Test Results\n====================\n\n";

const SEPARATOR_HEAVY: &str =
    "======================================================================";
const SEPARATOR_LIGHT: &str =
    "----------------------------------------------------------------------";

/// Streams a run as text into `out`.
pub struct TextReporter<W: Write> {
    out: W,
    colored: bool,
    failed_write: bool,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            colored: false,
            failed_write: false,
        }
    }

    /// Colors progress markers and the final verdict (console use).
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Writes the banner.
    pub fn banner(&mut self) {
        self.emit(BANNER.to_string());
    }

    /// Writes a discovery error in place of a run.
    pub fn service_error(&mut self, message: &str) {
        let line = if self.colored {
            message.red().to_string()
        } else {
            message.to_string()
        };
        self.emit(format!("{line}\n"));
    }

    /// `true` once a write to the underlying sink has failed; the reader is gone.
    pub fn is_disconnected(&self) -> bool {
        self.failed_write
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: String) {
        if self.failed_write {
            return;
        }
        if self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
            .is_err()
        {
            self.failed_write = true;
        }
    }

    fn error_list(&mut self, flavour: &str, entries: &[FailureDetail]) {
        for entry in entries {
            self.emit(format!(
                "{SEPARATOR_HEAVY}\n{flavour}: {}\n{SEPARATOR_LIGHT}\n{}\n\n",
                entry.description, entry.detail
            ));
        }
    }
}

impl<W: Write> RunObserver for TextReporter<W> {
    fn case_finished(&mut self, _case: &TestCase, outcome: &CaseOutcome, _result: &ExecutionResult) {
        let marker = outcome.progress_char().to_string();
        let marker = if !self.colored {
            marker
        } else {
            match outcome {
                CaseOutcome::Passed => marker.green().to_string(),
                CaseOutcome::Failed(_) => marker.red().to_string(),
                CaseOutcome::Errored(_) => marker.yellow().to_string(),
            }
        };
        self.emit(marker);
    }

    fn run_finished(&mut self, result: &ExecutionResult, elapsed: Duration) {
        self.emit("\n".to_string());
        self.error_list("ERROR", &result.errors);
        self.error_list("FAIL", &result.failures);

        let plural = if result.runs == 1 { "" } else { "s" };
        self.emit(format!(
            "{SEPARATOR_LIGHT}\nRan {} test{plural} in {:.3}s\n\n",
            result.runs,
            elapsed.as_secs_f64()
        ));

        let verdict = verdict(result);
        let verdict = match (self.colored, result.was_successful()) {
            (false, _) => verdict,
            (true, true) => verdict.green().bold().to_string(),
            (true, false) => verdict.red().bold().to_string(),
        };
        self.emit(format!("{verdict}\n"));
    }
}

/// `OK`, or `FAILED (failures=N, errors=M)` listing only the non-zero counts.
pub fn verdict(result: &ExecutionResult) -> String {
    if result.was_successful() {
        return "OK".to_string();
    }
    let mut parts = Vec::new();
    if !result.failures.is_empty() {
        parts.push(format!("failures={}", result.failures.len()));
    }
    if !result.errors.is_empty() {
        parts.push(format!("errors={}", result.errors.len()));
    }
    format!("FAILED ({})", parts.join(", "))
}

/// A `Write` sink that forwards every chunk to an async channel, for streaming
/// a report from a blocking worker into an HTTP body.
///
/// 一个将每个数据块转发到异步通道的 `Write` 接收器，
/// 用于将报告从阻塞工作线程流式传输到 HTTP 响应体。
pub struct ChannelWriter {
    tx: tokio::sync::mpsc::Sender<String>,
}

impl ChannelWriter {
    pub fn new(tx: tokio::sync::mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = String::from_utf8_lossy(buf).into_owned();
        self.tx
            .blocking_send(chunk)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "report reader went away"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
