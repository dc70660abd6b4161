//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command for the WebUnit CLI,
//! which creates a new runner configuration file.
//!
//! 此模块实现了 WebUnit CLI 的 `init` 命令，
//! 用于创建新的运行器配置文件。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::PathBuf};

use crate::infra::t;

pub const DEFAULT_CONFIG: &str = r#"# WebUnit Configuration / WebUnit 配置

# Language for console output and page labels / 控制台输出与页面标签的语言
language = "en"

# Address the HTTP server listens on / HTTP 服务器监听的地址
bind = "127.0.0.1:8080"

# Package searched when a request names neither a package nor a module
# 当请求既未指定包也未指定模块时搜索的包
default_package = "test"

# List packages from a directory of test_*.rs files instead of the registry
# 从包含 test_*.rs 文件的目录而不是注册表中列出包
# tests_root = "."

# Install a throwaway datastore for every run / 为每次运行安装一次性数据存储
isolate_storage = true

# Seconds between two polls of the result page / 结果页面两次轮询之间的秒数
poll_interval_secs = 5
"#;

/// Executes the init command with the provided arguments.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file
/// * `lang` - Language for console messages
///
/// # Returns
/// A Result indicating success or failure of the command execution
pub async fn execute(output: PathBuf, force: bool, lang: String) -> Result<()> {
    rust_i18n::set_locale(&lang);

    // Check if file already exists
    if output.exists() && !force {
        println!("{}", t!("init.file_exists", path = output.display()).red());
        println!("{}", t!("init.use_force").yellow());
        return Ok(());
    }

    // Create parent directories if needed
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                t!("init.create_parent_dir_failed", path = parent.display()).to_string()
            })?;
        }
    }

    let content = DEFAULT_CONFIG.replace("language = \"en\"", &format!("language = \"{lang}\""));
    fs::write(&output, content)
        .with_context(|| t!("init.write_failed", path = output.display()).to_string())?;

    println!("{}", t!("init.success", path = output.display()).green());
    println!("{}", t!("init.next_steps"));

    Ok(())
}
