//! # File System Operations Module / 文件系统操作模块
//!
//! This module lists packages from a directory tree, so `test_*.rs` files on
//! disk decide which registered modules a package run picks up.
//!
//! 此模块从目录树中列出包，由磁盘上的 `test_*.rs` 文件决定
//! 包运行时会选取哪些已注册的模块。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::registry::PackageSource;

/// Lists package entries from `root/<package path>`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageSource for DirectorySource {
    fn entries(&self, package: &str) -> io::Result<Vec<String>> {
        let dir = self.root.join(package_to_path(package));
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

/// Converts a dotted package name like `app.models.test` into the relative
/// path `app/models/test`.
///
/// # Arguments
/// * `package` - Dotted package name
///
/// # Returns
/// The relative directory path for the package
pub fn package_to_path(package: &str) -> PathBuf {
    package.split('.').filter(|part| !part.is_empty()).collect()
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}
