//! # Commands Module / 命令模块
//!
//! One submodule per CLI subcommand.
//! 每个 CLI 子命令对应一个子模块。

pub mod init;
pub mod list;
pub mod run;
pub mod serve;

use anyhow::Result;
use std::path::Path;

use crate::core::config::{RunnerConfig, load_or_default};
use crate::core::registry::Registry;
use crate::sample_app;

/// Loads the configuration and applies the `--lang` override.
pub(crate) fn load_settings(config: &Path, lang: Option<String>) -> Result<RunnerConfig> {
    let mut settings = load_or_default(config)?;
    if let Some(lang) = lang {
        settings.language = lang;
    }
    rust_i18n::set_locale(&settings.language);
    Ok(settings)
}

/// The modules registered by the stock binary.
pub(crate) fn bundled_registry() -> Registry {
    Registry::new().with_modules(sample_app::test_modules())
}
