//! # Config Module Unit Tests / Config 模块单元测试
//!
//! This module tests loading `WebUnit.toml`: defaults for omitted keys, explicit
//! values, `tests_root` expansion and malformed files.
//!
//! 此模块测试 `WebUnit.toml` 的加载：省略键的默认值、显式值、
//! `tests_root` 展开以及格式错误的文件。

use std::fs;
use tempfile::tempdir;
use webunit::cli::commands::init::DEFAULT_CONFIG;
use webunit::core::config::{RunnerConfig, load_config, load_or_default};

#[cfg(test)]
mod loading_tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: RunnerConfig = toml::from_str("").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.default_package, "test");
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert!(config.isolate_storage);
        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.tests_root, None);
    }

    #[test]
    fn test_explicit_values() {
        let config: RunnerConfig = toml::from_str(
            r#"
language = "zh-CN"
bind = "0.0.0.0:9000"
default_package = "suite"
tests_root = "/srv/app"
isolate_storage = false
poll_interval_secs = 2
"#,
        )
        .unwrap();

        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.default_package, "suite");
        assert!(!config.isolate_storage);
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(
            config.tests_root_path().unwrap(),
            Some(std::path::PathBuf::from("/srv/app"))
        );
    }

    #[test]
    fn test_generated_file_round_trips() {
        let config: RunnerConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, RunnerConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = load_or_default(&dir.path().join("WebUnit.toml")).unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert!(load_config(&dir.path().join("WebUnit.toml")).is_err());
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "bind = [unclosed").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
