//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for WebUnit,
//! such as file-system package listing and i18n support.
//!
//! 此模块为 WebUnit 提供基础设施服务，
//! 例如基于文件系统的包列举和国际化支持。

pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
