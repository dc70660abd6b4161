//! # WebUnit Library / WebUnit 库
//!
//! This library provides an in-process test runner that executes registered
//! test suites when asked over HTTP and publishes their results to a polling
//! web page, so an application can run its tests inside the environment it is
//! deployed to.
//!
//! 此库提供一个进程内测试运行器：通过 HTTP 请求执行已注册的测试套件，
//! 并将结果发布到一个轮询网页上，使应用能够在其部署环境中运行自己的测试。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, test registration and discovery, the execution engine
//! - `infra` - Infrastructure services like file-system package listing
//! - `reporting` - Status payload, HTML polling page and plain-text report
//! - `server` - The HTTP endpoints and the published result store
//! - `cli` - Command-line interface and commands
//! - `sample_app` - The bundled sample application and its tests
//!
//! - `core` - 数据模型、测试注册与发现、执行引擎
//! - `infra` - 基础设施服务，如基于文件系统的包列举
//! - `reporting` - 状态载荷、HTML 轮询页面与纯文本报告
//! - `server` - HTTP 端点与已发布结果的存储
//! - `cli` - 命令行接口和命令
//! - `sample_app` - 内置的示例应用及其测试

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;
pub mod sample_app;
pub mod server;

// Re-export commonly used items
pub use self::core::assertions;
pub use self::core::models;
pub use self::core::registry::{ModuleItem, Registry, TestFixture, TestModule, TestType};

/// Picks the UI language from the system locale.
///
/// Tries the full locale (e.g., "zh-CN") first, then the language part only
/// (e.g., "en" from "en-US"), and finally falls back to "en".
pub fn detect_locale() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
            .to_string()
    }
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
