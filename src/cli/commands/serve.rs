//! # Serve Command Module / 服务命令模块
//!
//! This module implements the `serve` command, which starts the HTTP runner
//! with the bundled modules registered.
//!
//! 此模块实现 `serve` 命令，启动注册了内置模块的 HTTP 运行器。

use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    cli::{
        commands::{bundled_registry, load_settings},
        init_logging,
    },
    infra::{fs::is_directory, t},
    server::{self, AppState},
};

/// Executes the serve command.
///
/// # Arguments
/// * `config` - Path to the configuration file (defaults apply when it is missing)
/// * `bind` - Optional address overriding the configured one
/// * `lang` - Optional language overriding the configured one
pub async fn execute(config: PathBuf, bind: Option<String>, lang: Option<String>) -> Result<()> {
    init_logging("info");

    let mut settings = load_settings(&config, lang)?;
    if let Some(bind) = bind {
        settings.bind = bind;
    }
    let locale = settings.language.clone();

    if let Some(root) = settings.tests_root_path()? {
        if !is_directory(&root) {
            println!(
                "{}",
                t!("serve.tests_root_missing", locale = &locale, path = root.display()).yellow()
            );
        }
    }

    let addr = settings.bind.clone();
    let state = AppState::new(bundled_registry(), settings)?;

    println!(
        "{}",
        t!("serve.listening", locale = &locale, addr = &addr).green()
    );

    let shutdown = setup_signal_handler(&locale);
    server::serve(state, &addr, shutdown).await
}

/// Sets up a signal handler for graceful shutdown.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("serve.shutdown_signal", locale = &locale).yellow());
        }
        token_clone.cancel();
    });

    token
}
