//! # Result Store Module / 结果存储模块
//!
//! Holds the latest published [`RunState`]. Writers always build a complete new
//! value and swap a single `Arc`, so a reader sees either the previous value or
//! the new one, never a mix. Each run takes a ticket; only the newest ticket may
//! publish, so an older run that finishes late cannot overwrite a newer run.
//!
//! 保存最新发布的 [`RunState`]。写入方总是构建一个完整的新值并替换单个 `Arc`，
//! 因此读取方看到的要么是旧值，要么是新值，绝不会是两者的混合。
//! 每次运行领取一张票据；只有最新的票据可以发布，
//! 因此较晚结束的旧运行无法覆盖较新的运行。

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::models::RunState;

/// An immutable published value together with the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// `0` before the first run.
    pub run_id: u64,
    pub state: RunState,
}

/// Identifies one run request.
#[derive(Debug, PartialEq, Eq)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct ResultStore {
    latest: RwLock<Arc<Published>>,
    issued: AtomicU64,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(Arc::new(Published {
                run_id: 0,
                state: RunState::Idle,
            })),
            issued: AtomicU64::new(0),
        }
    }

    /// Starts a new run. Any run started earlier loses the right to publish.
    pub fn begin_run(&self) -> RunTicket {
        RunTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replaces the published value if `ticket` is still the newest run.
    /// Returns whether the value was accepted.
    pub fn publish(&self, ticket: &RunTicket, state: RunState) -> bool {
        let mut latest = self.latest.write();
        if ticket.0 != self.issued.load(Ordering::SeqCst) || ticket.0 < latest.run_id {
            return false;
        }
        *latest = Arc::new(Published {
            run_id: ticket.0,
            state,
        });
        true
    }

    /// The value most recently published.
    pub fn snapshot(&self) -> Arc<Published> {
        Arc::clone(&*self.latest.read())
    }
}
