//! # Status Payload Module / 状态载荷模块
//!
//! Serializes the latest [`RunState`] into the payload read by the polling page:
//!
//! ```text
//! {"svcerr":0,"svcinfo":"","runs":"2","total":"2","errors":"0","failures":"1",
//!  "details":{"ERROR":[],"FAIL":[{"desc":"...","detail":"..."}]}}
//! ```
//!
//! A discovery error short-circuits everything but `svcerr` and `svcinfo`.
//! Free text is escaped with [`escape`] before it is placed in the payload; the
//! payload itself is built structurally with `serde_json`, so empty lists come
//! out as `[]` and the result always parses.
//!
//! 将最新的 [`RunState`] 序列化为轮询页面读取的载荷。
//! 发现错误会使除 `svcerr` 与 `svcinfo` 外的所有字段缺省。
//! 自由文本在放入载荷前先经过 [`escape`] 转义；载荷本身由 `serde_json`
//! 结构化构建，因此空列表输出为 `[]`，结果总是可以解析。

use serde::Serialize;

use crate::core::models::{ExecutionResult, FailureDetail, RunState};

/// Replaces `"` with `&quot;` and newlines with `<br/>`. Nothing else changes.
///
/// 将 `"` 替换为 `&quot;`，将换行替换为 `<br/>`。其他字符保持不变。
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("<br/>"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Serialize)]
pub struct StatusPayload {
    pub svcerr: u8,
    pub svcinfo: String,
    #[serde(flatten)]
    pub counts: Option<Counts>,
}

#[derive(Debug, Serialize)]
pub struct Counts {
    pub runs: String,
    pub total: String,
    pub errors: String,
    pub failures: String,
    pub details: Details,
}

#[derive(Debug, Serialize)]
pub struct Details {
    #[serde(rename = "ERROR")]
    pub error: Vec<Entry>,
    #[serde(rename = "FAIL")]
    pub fail: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct Entry {
    pub desc: String,
    pub detail: String,
}

impl From<&FailureDetail> for Entry {
    fn from(detail: &FailureDetail) -> Self {
        Self {
            desc: escape(&detail.description),
            detail: escape(&detail.detail),
        }
    }
}

impl From<&ExecutionResult> for Counts {
    fn from(result: &ExecutionResult) -> Self {
        Self {
            runs: result.runs.to_string(),
            total: result.total.to_string(),
            errors: result.errors.len().to_string(),
            failures: result.failures.len().to_string(),
            details: Details {
                error: result.errors.iter().map(Entry::from).collect(),
                fail: result.failures.iter().map(Entry::from).collect(),
            },
        }
    }
}

impl StatusPayload {
    pub fn from_state(state: &RunState) -> Self {
        match state {
            RunState::ServiceError(message) => Self {
                svcerr: 1,
                svcinfo: escape(message),
                counts: None,
            },
            RunState::Idle => Self {
                svcerr: 0,
                svcinfo: String::new(),
                counts: Some(Counts::from(&ExecutionResult::default())),
            },
            RunState::Result(result) => Self {
                svcerr: 0,
                svcinfo: String::new(),
                counts: Some(Counts::from(result)),
            },
        }
    }
}

/// Renders `state` as the wire payload string.
pub fn render_status(state: &RunState) -> String {
    // Every field is a plain string, integer or list of those.
    serde_json::to_string(&StatusPayload::from_state(state)).unwrap_or_else(|_| {
        r#"{"svcerr":1,"svcinfo":"result serialization failed"}"#.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quotes_and_newlines() {
        assert_eq!(
            escape("He said \"hi\"\nagain"),
            "He said &quot;hi&quot;<br/>again"
        );
        assert_eq!(escape("back\\slash\ttab"), "back\\slash\ttab");
    }
}
