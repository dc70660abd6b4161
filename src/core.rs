//! # Core Module / 核心模块
//!
//! This module contains the core functionality of WebUnit: data models,
//! configuration, test registration and discovery, and the execution engine.
//!
//! 此模块包含 WebUnit 的核心功能：数据模型、配置、测试注册与发现，
//! 以及执行引擎。

pub mod assertions;
pub mod config;
pub mod execution;
pub mod locator;
pub mod models;
pub mod registry;
pub mod storage;

// Re-exports
pub use config::RunnerConfig;
pub use execution::Executor;
pub use locator::{Locator, Selector};
pub use models::{ExecutionResult, TestSuite};
