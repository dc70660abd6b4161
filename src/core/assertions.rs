//! Assertion helpers for test bodies.
//!
//! Test bodies return `anyhow::Result<()>`. Returning an error whose root cause
//! is an [`AssertionFailure`] marks the case as *failed*; any other error marks
//! it as *errored*. A panic counts as a failure when its payload is an
//! [`AssertionFailure`] or its message starts with `assertion`, which covers
//! `assert_eq!`, `assert_ne!` and a bare `assert!(cond)`.
//!
//! `assert!(cond, "message")` panics with just the custom message, so it is
//! recorded as an error. Use [`check`] or [`check_eq`] to get a failure with
//! your own message.

use std::fmt::Debug;
use thiserror::Error;

/// An assertion that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fails the current case unconditionally.
pub fn fail(message: impl Into<String>) -> anyhow::Error {
    AssertionFailure::new(message).into()
}

/// Fails the current case with `message` unless `condition` holds.
pub fn check(condition: bool, message: impl Into<String>) -> anyhow::Result<()> {
    if condition {
        Ok(())
    } else {
        Err(fail(message))
    }
}

/// Fails with `left != right` when the values differ.
pub fn check_eq<T: PartialEq + Debug>(left: T, right: T) -> anyhow::Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(fail(format!("{left:?} != {right:?}")))
    }
}

/// Returns `true` when `error` (or anything in its chain) is an assertion failure.
pub fn is_assertion_failure(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| cause.downcast_ref::<AssertionFailure>().is_some())
}
