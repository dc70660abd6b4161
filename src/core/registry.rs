//! # Test Registry Module / 测试注册模块
//!
//! Test code is compiled into the application, so modules are made known to the
//! runner by registration instead of by importing source files at run time.
//! A [`TestModule`] holds named top-level items; items tagged as
//! [`ModuleItem::TestType`] carry the test methods of one fixture type.
//!
//! 测试代码被编译进应用程序，因此模块通过注册而非运行时导入源文件的方式
//! 告知运行器。[`TestModule`] 持有具名的顶层条目；标记为
//! [`ModuleItem::TestType`] 的条目携带某个 fixture 类型的测试方法。

use anyhow::Result;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::models::{Instantiator, TestCase};

/// Methods whose name starts with this prefix are expanded into test cases.
pub const TEST_METHOD_PREFIX: &str = "test";

/// Per-case fixture state. A fresh value is created for every case.
///
/// 每个用例的 fixture 状态。每个用例都会创建一个新的值。
pub trait TestFixture: Default + Send + 'static {
    fn set_up(&mut self) -> Result<()> {
        Ok(())
    }

    fn tear_down(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A fixture instance bound to one test method, as seen by the executor.
pub trait CaseInstance: Send {
    fn set_up(&mut self) -> Result<()>;
    fn call(&mut self) -> Result<()>;
    fn tear_down(&mut self) -> Result<()>;
}

/// Signature of a test method body.
pub type TestBody<F> = fn(&mut F) -> Result<()>;

struct BoundCase<F: TestFixture> {
    fixture: F,
    body: TestBody<F>,
}

impl<F: TestFixture> CaseInstance for BoundCase<F> {
    fn set_up(&mut self) -> Result<()> {
        self.fixture.set_up()
    }

    fn call(&mut self) -> Result<()> {
        (self.body)(&mut self.fixture)
    }

    fn tear_down(&mut self) -> Result<()> {
        self.fixture.tear_down()
    }
}

#[derive(Clone)]
struct TestMethod {
    doc: Option<String>,
    instantiate: Instantiator,
}

/// A fixture type together with its methods, e.g. `GuestbookTest`.
///
/// 一个 fixture 类型及其方法，例如 `GuestbookTest`。
#[derive(Clone)]
pub struct TestType {
    name: String,
    methods: BTreeMap<String, TestMethod>,
}

impl TestType {
    /// Starts declaring a test type whose cases run against fixture `F`.
    pub fn of<F: TestFixture>(name: impl Into<String>) -> TestTypeBuilder<F> {
        TestTypeBuilder {
            name: name.into(),
            methods: BTreeMap::new(),
            _fixture: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expands the type into one case per `test*` method, ordered by method name.
    ///
    /// 将该类型展开为每个 `test*` 方法对应的一个用例，按方法名排序。
    pub fn cases(&self, module: &str) -> Vec<TestCase> {
        self.methods
            .iter()
            .filter(|(name, _)| name.starts_with(TEST_METHOD_PREFIX))
            .map(|(name, method)| {
                TestCase::new(
                    module,
                    &self.name,
                    name,
                    method.doc.clone(),
                    method.instantiate.clone(),
                )
            })
            .collect()
    }
}

pub struct TestTypeBuilder<F: TestFixture> {
    name: String,
    methods: BTreeMap<String, TestMethod>,
    _fixture: PhantomData<fn() -> F>,
}

impl<F: TestFixture> TestTypeBuilder<F> {
    /// Adds a method without a doc summary.
    pub fn method(self, name: impl Into<String>, body: TestBody<F>) -> Self {
        self.insert(name.into(), None, body)
    }

    /// Adds a method whose first doc line becomes its description.
    pub fn documented(self, name: impl Into<String>, doc: impl Into<String>, body: TestBody<F>) -> Self {
        self.insert(name.into(), Some(doc.into()), body)
    }

    fn insert(mut self, name: String, doc: Option<String>, body: TestBody<F>) -> Self {
        let instantiate: Instantiator = Arc::new(move || {
            Box::new(BoundCase {
                fixture: F::default(),
                body,
            }) as Box<dyn CaseInstance>
        });
        self.methods.insert(name, TestMethod { doc, instantiate });
        self
    }

    pub fn build(self) -> TestType {
        TestType {
            name: self.name,
            methods: self.methods,
        }
    }
}

/// A top-level item of a registered module.
#[derive(Clone)]
pub enum ModuleItem {
    /// A type tagged as a test case container.
    TestType(TestType),
    /// Anything else the module exposes (helpers, constants, ...).
    Other,
}

/// A named collection of top-level items, the unit resolved by name.
///
/// 具名的顶层条目集合，是按名称解析的单元。
#[derive(Clone)]
pub struct TestModule {
    name: String,
    items: BTreeMap<String, ModuleItem>,
}

impl TestModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: BTreeMap::new(),
        }
    }

    /// Adds a test type under its own name.
    pub fn with_type(mut self, test_type: TestType) -> Self {
        self.items
            .insert(test_type.name.clone(), ModuleItem::TestType(test_type));
        self
    }

    /// Adds an arbitrary item under `name`.
    pub fn with_item(mut self, name: impl Into<String>, item: ModuleItem) -> Self {
        self.items.insert(name.into(), item);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level items, ordered by name.
    pub fn items(&self) -> impl Iterator<Item = (&str, &ModuleItem)> {
        self.items.iter().map(|(name, item)| (name.as_str(), item))
    }
}

/// Resolves a dotted module name into a loaded module.
///
/// 将点分模块名解析为已加载的模块。
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<TestModule>>;
}

/// Lists the entries of a package, e.g. `["test_guestbook.rs", "helpers.rs"]`.
///
/// 列出包中的条目，例如 `["test_guestbook.rs", "helpers.rs"]`。
pub trait PackageSource: Send + Sync {
    fn entries(&self, package: &str) -> std::io::Result<Vec<String>>;
}

/// In-memory module table. Also acts as a package source, listing every module
/// registered directly inside a package as `<leaf>.rs`.
///
/// 内存中的模块表。同时充当包来源，将直接注册在某个包内的每个模块
/// 列为 `<leaf>.rs`。
#[derive(Clone, Default)]
pub struct Registry {
    modules: BTreeMap<String, Arc<TestModule>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: TestModule) {
        self.modules.insert(module.name.clone(), Arc::new(module));
    }

    pub fn with_modules(mut self, modules: impl IntoIterator<Item = TestModule>) -> Self {
        for module in modules {
            self.register(module);
        }
        self
    }
}

impl ModuleResolver for Registry {
    fn resolve(&self, name: &str) -> Option<Arc<TestModule>> {
        self.modules.get(name).cloned()
    }
}

impl PackageSource for Registry {
    fn entries(&self, package: &str) -> std::io::Result<Vec<String>> {
        let prefix = format!("{package}.");
        let mut found_package = false;
        let mut entries = Vec::new();

        for name in self.modules.keys() {
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            found_package = true;
            if !rest.contains('.') {
                entries.push(format!("{rest}.rs"));
            }
        }

        if found_package {
            Ok(entries)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no module is registered under package '{package}'"),
            ))
        }
    }
}
