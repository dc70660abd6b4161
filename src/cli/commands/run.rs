//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which executes one suite in the
//! console and prints the plain-text report as it goes.
//!
//! 此模块实现 `run` 命令：在控制台中执行一个测试套件，并边运行边打印纯文本报告。

use anyhow::{Context, Result};
use colored::*;
use std::io;
use std::path::PathBuf;

use crate::{
    cli::{
        commands::{bundled_registry, load_settings},
        init_logging,
    },
    core::models::RunState,
    infra::t,
    reporting::console::TextReporter,
    server::{AppState, RunParams, run_request},
};

/// Executes the run command and reports whether every case passed.
///
/// # Arguments
/// * `config` - Path to the configuration file
/// * `package` - Package to run (mutually exclusive with `module`)
/// * `module` - Module to run
/// * `lang` - Optional language overriding the configured one
///
/// # Returns
/// `Ok(true)` when the suite ran without failures or errors
pub async fn execute(
    config: PathBuf,
    package: Option<String>,
    module: Option<String>,
    lang: Option<String>,
) -> Result<bool> {
    init_logging("warn");

    let settings = load_settings(&config, lang)?;
    let locale = settings.language.clone();
    let state = AppState::new(bundled_registry(), settings)?;
    let params = RunParams {
        package,
        module,
        format: Some("plain".to_string()),
    };

    let outcome = tokio::task::spawn_blocking(move || {
        let mut reporter = TextReporter::new(io::stdout()).colored(true);
        reporter.banner();
        let outcome = run_request(&state, &params, &mut reporter);
        if let RunState::ServiceError(message) = &outcome {
            reporter.service_error(message);
        }
        outcome
    })
    .await
    .context("Test run worker failed")?;

    let passed = match outcome {
        RunState::Result(result) => result.was_successful(),
        _ => false,
    };
    if !passed {
        eprintln!("{}", t!("run.failed", locale = &locale).red().bold());
    }
    Ok(passed)
}
