//! # Test Locator Module / 测试定位模块
//!
//! Turns a package or module selector into a [`TestSuite`].
//!
//! Package selectors list the package's entries and resolve every `test_*.rs`
//! entry as a module. Module selectors are resolved first as given, then
//! qualified under the enclosing package, then under the default test package.
//! Inside a module only items named `*Test` and tagged as test types contribute
//! cases.
//!
//! 将包或模块选择器转换为 [`TestSuite`]。
//!
//! 包选择器列出包的条目，并将每个 `test_*.rs` 条目作为模块解析。
//! 模块选择器依次按原样、在所属包下限定、在默认测试包下限定进行解析。
//! 模块内只有名称为 `*Test` 且被标记为测试类型的条目才会产生用例。

use std::sync::Arc;
use thiserror::Error;

use crate::core::models::TestSuite;
use crate::core::registry::{ModuleItem, ModuleResolver, PackageSource, TestModule};

/// Package used when neither a package nor a module is requested.
pub const DEFAULT_PACKAGE: &str = "test";
/// Prefix of module entries collected from a package.
pub const MODULE_PREFIX: &str = "test_";
/// Extension of module entries collected from a package.
pub const MODULE_EXTENSION: &str = ".rs";
/// Suffix of item names that may hold test cases.
pub const TYPE_SUFFIX: &str = "Test";

/// What the caller asked to run.
///
/// 调用者请求运行的内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Package(String),
    Module(String),
}

impl Selector {
    /// Builds a selector from the two optional request parameters.
    /// Empty strings count as absent; neither selects `default_package`.
    pub fn from_params(
        package: Option<&str>,
        module: Option<&str>,
        default_package: &str,
    ) -> Result<Self, DiscoveryError> {
        let package = package.filter(|p| !p.is_empty());
        let module = module.filter(|m| !m.is_empty());

        match (package, module) {
            (Some(_), Some(_)) => Err(DiscoveryError::ConflictingSelectors),
            (Some(package), None) => Ok(Selector::Package(package.to_string())),
            (None, Some(module)) => Ok(Selector::Module(module.to_string())),
            (None, None) => Ok(Selector::Package(default_package.to_string())),
        }
    }
}

/// Reasons discovery produced no suite.
///
/// 发现阶段未能产生测试套件的原因。
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("parameter 'package' and 'module' cannot be used at the same time")]
    ConflictingSelectors,
    #[error("Module '{0}' cannot be found.")]
    ModuleNotFound(String),
    #[error("Package '{package}' cannot be listed: {source}")]
    PackageNotFound {
        package: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Module '{0}' does not contain any test case")]
    NoTestsInModule(String),
    #[error("No test case is found in '{0}' package")]
    NoTestsInPackage(String),
}

/// Resolves selectors against a module resolver and a package source.
pub struct Locator {
    resolver: Arc<dyn ModuleResolver>,
    packages: Arc<dyn PackageSource>,
    default_package: String,
}

impl Locator {
    pub fn new(resolver: Arc<dyn ModuleResolver>, packages: Arc<dyn PackageSource>) -> Self {
        Self {
            resolver,
            packages,
            default_package: DEFAULT_PACKAGE.to_string(),
        }
    }

    pub fn with_default_package(mut self, package: impl Into<String>) -> Self {
        self.default_package = package.into();
        self
    }

    pub fn default_package(&self) -> &str {
        &self.default_package
    }

    /// Produces the suite for `selector`. An empty discovery is an error.
    pub fn locate(&self, selector: &Selector) -> Result<TestSuite, DiscoveryError> {
        match selector {
            Selector::Package(package) => {
                let suite = self.search_package(package)?;
                if suite.is_empty() {
                    return Err(DiscoveryError::NoTestsInPackage(package.clone()));
                }
                Ok(suite)
            }
            Selector::Module(module) => {
                let suite = self.search_module(module, None)?;
                if suite.is_empty() {
                    return Err(DiscoveryError::NoTestsInModule(module.clone()));
                }
                Ok(suite)
            }
        }
    }

    fn search_package(&self, package: &str) -> Result<TestSuite, DiscoveryError> {
        let mut entries = self
            .packages
            .entries(package)
            .map_err(|source| DiscoveryError::PackageNotFound {
                package: package.to_string(),
                source,
            })?;
        entries.sort();

        let mut suite = TestSuite::new();
        for entry in &entries {
            if !entry.starts_with(MODULE_PREFIX) {
                continue;
            }
            if let Some(module_name) = entry.strip_suffix(MODULE_EXTENSION) {
                suite.extend(self.search_module(module_name, Some(package))?);
            }
        }
        Ok(suite)
    }

    fn search_module(&self, name: &str, package: Option<&str>) -> Result<TestSuite, DiscoveryError> {
        let module = self
            .resolve(name, package)
            .ok_or_else(|| DiscoveryError::ModuleNotFound(name.to_string()))?;
        Ok(collect_cases(&module))
    }

    fn resolve(&self, name: &str, package: Option<&str>) -> Option<Arc<TestModule>> {
        let mut candidates = vec![name.to_string()];
        if let Some(package) = package {
            candidates.push(format!("{package}.{name}"));
        }
        candidates.push(format!("{}.{name}", self.default_package));
        candidates.dedup();

        candidates
            .iter()
            .find_map(|candidate| self.resolver.resolve(candidate))
    }
}

/// Expands every `*Test` test type of `module` into cases, ordered by item name.
fn collect_cases(module: &TestModule) -> TestSuite {
    let mut suite = TestSuite::new();
    for (name, item) in module.items() {
        if !name.ends_with(TYPE_SUFFIX) {
            continue;
        }
        if let ModuleItem::TestType(test_type) = item {
            for case in test_type.cases(module.name()) {
                suite.add(case);
            }
        }
    }
    suite
}
