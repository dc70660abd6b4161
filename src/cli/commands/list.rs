//! # List Command Module / 列举命令模块
//!
//! Prints the identifiers of the cases a selector discovers, without running them.
//! 打印选择器发现的用例标识符，但不运行它们。

use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use crate::{
    cli::{
        commands::{bundled_registry, load_settings},
        init_logging,
    },
    core::locator::Selector,
    infra::t,
    server::AppState,
};

/// Executes the list command. A discovery error is reported and yields `Ok(false)`.
pub fn execute(
    config: PathBuf,
    package: Option<String>,
    module: Option<String>,
    lang: Option<String>,
) -> Result<bool> {
    init_logging("warn");

    let settings = load_settings(&config, lang)?;
    let locale = settings.language.clone();
    let state = AppState::new(bundled_registry(), settings)?;

    let located = Selector::from_params(
        package.as_deref(),
        module.as_deref(),
        state.locator.default_package(),
    )
    .and_then(|selector| state.locator.locate(&selector));

    match located {
        Ok(suite) => {
            println!("{}", t!("list.header", locale = &locale, count = suite.len()).bold());
            for id in suite.ids() {
                println!("  - {}", id);
            }
            Ok(true)
        }
        Err(e) => {
            println!("{}", e.to_string().red());
            Ok(false)
        }
    }
}
