//! # Sample Application / 示例应用
//!
//! A tiny guestbook stored through the datastore seam, plus the test modules the
//! stock `webunit` binary registers for it (`test.test_guestbook` and
//! `test.test_index`). Applications embedding the runner register their own
//! modules instead.
//!
//! 一个通过数据存储接口保存数据的小型留言簿，以及内置 `webunit` 二进制为其注册的
//! 测试模块（`test.test_guestbook` 与 `test.test_index`）。
//! 嵌入运行器的应用会注册它们自己的模块。

use anyhow::{Result, bail};
use maud::html;
use std::sync::Arc;

use crate::core::assertions::{check, check_eq, fail};
use crate::core::registry::{ModuleItem, TestFixture, TestModule, TestType};
use crate::core::storage::{self, Datastore};

const KEY_PREFIX: &str = "greeting:";

/// One guestbook entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub author: String,
    pub message: String,
}

/// The guestbook, bound to whichever datastore is current when it is opened.
pub struct Guestbook {
    store: Arc<dyn Datastore>,
}

impl Guestbook {
    pub fn open() -> Self {
        Self {
            store: storage::current(),
        }
    }

    pub fn with_store(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }

    /// Name of the backing datastore.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Stores a greeting and returns its sequence number.
    pub fn sign(&self, author: &str, message: &str) -> Result<usize> {
        if message.trim().is_empty() {
            bail!("a greeting needs a message");
        }
        let author = if author.trim().is_empty() { "anonymous" } else { author.trim() };
        let number = self.greetings().len() + 1;
        self.store
            .put(&format!("{KEY_PREFIX}{number:06}"), format!("{author}\n{}", message.trim()));
        Ok(number)
    }

    /// All greetings, oldest first.
    pub fn greetings(&self) -> Vec<Greeting> {
        self.store
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(KEY_PREFIX))
            .filter_map(|key| self.store.get(&key))
            .filter_map(|value| {
                let (author, message) = value.split_once('\n')?;
                Some(Greeting {
                    author: author.to_string(),
                    message: message.to_string(),
                })
            })
            .collect()
    }

    /// The index page.
    pub fn render_index(&self) -> String {
        let greetings = self.greetings();
        html! {
            h1 { "Guestbook" }
            @if greetings.is_empty() {
                p.empty { "No greetings yet." }
            } @else {
                ul {
                    @for greeting in &greetings {
                        li { b { (greeting.author) } ": " (greeting.message) }
                    }
                }
            }
        }
        .into_string()
    }
}

#[derive(Default)]
struct GuestbookFixture {
    book: Option<Guestbook>,
}

impl GuestbookFixture {
    fn book(&self) -> Result<&Guestbook> {
        self.book.as_ref().ok_or_else(|| fail("guestbook was not opened in set_up"))
    }
}

impl TestFixture for GuestbookFixture {
    fn set_up(&mut self) -> Result<()> {
        self.book = Some(Guestbook::open());
        Ok(())
    }
}

/// The test modules of the sample application.
pub fn test_modules() -> Vec<TestModule> {
    let guestbook = TestType::of::<GuestbookFixture>("GuestbookTest")
        .documented(
            "test_sign_stores_greeting",
            "Signing stores the greeting with its author.",
            |f| {
                let book = f.book()?;
                let before = book.greetings().len();
                book.sign("ada", "hello")?;
                let greetings = book.greetings();
                check_eq(greetings.len(), before + 1)?;
                check_eq(greetings.last().map(|g| g.author.as_str()), Some("ada"))
            },
        )
        .method("test_empty_message_rejected", |f| {
            check(f.book()?.sign("ada", "   ").is_err(), "empty message was accepted")
        })
        .method("test_blank_author_is_anonymous", |f| {
            let book = f.book()?;
            book.sign("", "hi")?;
            check_eq(
                book.greetings().last().map(|g| g.author.clone()),
                Some("anonymous".to_string()),
            )
        })
        .documented(
            "test_runs_against_isolated_store",
            "Runs never see the development datastore.",
            |f| {
                let name = f.book()?.store_name().to_string();
                check(name != "development", format!("test ran against '{name}'"))
            },
        )
        .build();

    let index = TestType::of::<GuestbookFixture>("IndexTest")
        .method("test_default_page", |f| {
            let page = f.book()?.render_index();
            check(page.contains("<h1>Guestbook</h1>"), "missing page heading")
        })
        .build();

    vec![
        TestModule::new("test.test_guestbook")
            .with_type(guestbook)
            .with_item("KEY_PREFIX", ModuleItem::Other),
        TestModule::new("test.test_index").with_type(index),
    ]
}
