//! # Configuration Module / 配置模块
//!
//! Runner settings, read from an optional `WebUnit.toml`.
//! 运行器设置，从可选的 `WebUnit.toml` 读取。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::locator::DEFAULT_PACKAGE;

/// Default configuration file name / 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "WebUnit.toml";

/// Settings shared by the server and the console commands.
///
/// 服务器与控制台命令共享的设置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// The language for console output and page labels (e.g., "en", "zh-CN").
    /// 控制台输出与页面标签使用的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,

    /// Address the HTTP server listens on.
    /// HTTP 服务器监听的地址。
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Package searched when a request names neither a package nor a module.
    /// 当请求既未指定包也未指定模块时搜索的包。
    #[serde(default = "default_package")]
    pub default_package: String,

    /// When set, packages are listed from this directory (dots map to path
    /// separators) instead of from the module registry. `~` and environment
    /// variables are expanded.
    /// 设置后，包将从此目录中列出（点映射为路径分隔符），而不是从模块注册表中列出。
    /// 支持展开 `~` 和环境变量。
    #[serde(default)]
    pub tests_root: Option<String>,

    /// Install a throwaway datastore for every run.
    /// 为每次运行安装一个一次性数据存储。
    #[serde(default = "default_true")]
    pub isolate_storage: bool,

    /// Seconds between two polls of the result page.
    /// 结果页面两次轮询之间的秒数。
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            bind: default_bind(),
            default_package: default_package(),
            tests_root: None,
            isolate_storage: true,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl RunnerConfig {
    /// The expanded `tests_root`, if one is configured.
    pub fn tests_root_path(&self) -> Result<Option<PathBuf>> {
        self.tests_root
            .as_deref()
            .map(|raw| {
                shellexpand::full(raw)
                    .map(|expanded| PathBuf::from(expanded.as_ref()))
                    .with_context(|| format!("Failed to expand tests_root: {raw}"))
            })
            .transpose()
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_package() -> String {
    DEFAULT_PACKAGE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    5
}

/// Parses a configuration file.
pub fn load_config(path: &Path) -> Result<RunnerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Loads `path` when it exists, otherwise returns the defaults.
pub fn load_or_default(path: &Path) -> Result<RunnerConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(RunnerConfig::default())
    }
}
