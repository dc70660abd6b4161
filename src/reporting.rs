//! # Reporting Module / 报告模块
//!
//! This module turns run outcomes into the three shapes clients consume: the
//! JSON-like status payload polled by the result page, the HTML polling shell,
//! and the streamed plain-text report.
//!
//! 此模块将运行结果转换为客户端使用的三种形式：结果页面轮询的类 JSON 状态载荷、
//! HTML 轮询页面，以及流式输出的纯文本报告。

pub mod console;
pub mod html;
pub mod wire;

// Re-export common reporting functions
pub use console::TextReporter;
pub use html::render_shell;
pub use wire::{escape, render_status};
