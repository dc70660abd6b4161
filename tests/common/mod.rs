// Shared test helpers for integration tests
#![allow(dead_code)]

use anyhow::{Result, bail};
use std::sync::Arc;

use webunit::assertions::{check_eq, fail};
use webunit::core::storage::{MemoryDatastore, StorageSlot};
use webunit::{ModuleItem, Registry, TestFixture, TestModule, TestType};

/// Package every helper module is registered under.
pub const PACKAGE: &str = "suite";

#[derive(Default)]
pub struct Plain;
impl TestFixture for Plain {}

/// Fixture whose set-up always fails.
#[derive(Default)]
pub struct BrokenSetUp;
impl TestFixture for BrokenSetUp {
    fn set_up(&mut self) -> Result<()> {
        bail!("fixture could not be prepared")
    }
}

/// Fixture whose tear-down always fails.
#[derive(Default)]
pub struct BrokenTearDown;
impl TestFixture for BrokenTearDown {
    fn tear_down(&mut self) -> Result<()> {
        bail!("fixture could not be released")
    }
}

/// One passing case and one assertion mismatch.
pub fn pair_module() -> TestModule {
    TestModule::new("suite.test_pair").with_type(
        TestType::of::<Plain>("PairTest")
            .method("test_one_passes", |_| check_eq(2 + 2, 4))
            .method("test_two_fails", |_| check_eq("left", "right"))
            .build(),
    )
}

/// Every outcome, plus items the locator must skip.
pub fn mixed_module() -> TestModule {
    let mixed = TestType::of::<Plain>("MixedTest")
        .method("test_passes", |_| Ok(()))
        .method("test_fails", |_| check_eq(1, 2))
        .method("test_errors", |_| bail!("database unavailable"))
        .method("test_panics", |_| panic!("boom"))
        .method("test_assert_macro", |_| {
            assert_eq!(1 + 1, 3);
            Ok(())
        })
        .method("helper_not_a_test", |_| bail!("must never run"))
        .build();

    let unsuffixed = TestType::of::<Plain>("Helper")
        .method("test_hidden", |_| bail!("must never run"))
        .build();

    TestModule::new("suite.test_mixed")
        .with_type(mixed)
        .with_item("Helper", ModuleItem::TestType(unsuffixed))
        .with_item("NotReallyTest", ModuleItem::Other)
}

/// Set-up and tear-down problems.
pub fn lifecycle_module() -> TestModule {
    TestModule::new("suite.test_lifecycle")
        .with_type(
            TestType::of::<BrokenSetUp>("SetUpErrorTest")
                .method("test_never_runs", |_| Err(fail("body ran after a failed set_up")))
                .build(),
        )
        .with_type(
            TestType::of::<BrokenTearDown>("TearDownErrorTest")
                .method("test_body_fails", |_| check_eq(1, 3))
                .method("test_body_passes", |_| Ok(()))
                .build(),
        )
}

pub fn quoting_module() -> TestModule {
    TestModule::new("suite.test_quoting").with_type(
        TestType::of::<Plain>("QuotingTest")
            .documented(
                "test_quoted",
                "Reports \"quoted\" text\nsecond doc line",
                |_| Err(fail("line one\nsaid \"no\"")),
            )
            .build(),
    )
}

pub fn empty_module() -> TestModule {
    TestModule::new("suite.test_empty").with_item("UTILS", ModuleItem::Other)
}

pub fn helpers_module() -> TestModule {
    TestModule::new("suite.helpers").with_type(
        TestType::of::<Plain>("HelpersTest")
            .method("test_skipped_by_package_listing", |_| bail!("must never run"))
            .build(),
    )
}

/// Every helper module, registered under [`PACKAGE`].
///
/// Package `suite` resolves to 11 cases: 4 errors and 5 failures.
pub fn registry() -> Registry {
    Registry::new().with_modules([
        pair_module(),
        mixed_module(),
        lifecycle_module(),
        quoting_module(),
        empty_module(),
        helpers_module(),
    ])
}

/// A private storage slot so tests never touch the process-wide one.
pub fn private_slot(name: &str) -> Arc<StorageSlot> {
    Arc::new(StorageSlot::new(Arc::new(MemoryDatastore::new(name))))
}
