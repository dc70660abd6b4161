//! # Storage Isolation Module / 存储隔离模块
//!
//! Application code under test reaches its persistence layer through a
//! [`StorageSlot`]. During a run the executor installs a throwaway datastore into
//! the slot with a [`ScopedDatastore`] guard, which removes that override again
//! when dropped, including during unwinding. Test runs therefore never touch the
//! application's development data.
//!
//! 被测应用代码通过 [`StorageSlot`] 访问其持久层。运行期间，执行器借助
//! [`ScopedDatastore`] guard 将一个一次性的数据存储安装到槽中，guard 在被丢弃时
//! （包括栈展开期间）会移除该覆盖。因此测试运行永远不会触及应用的开发数据。

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A minimal key-value persistence interface.
pub trait Datastore: Send + Sync {
    /// A short label identifying the store in logs.
    fn name(&self) -> &str;
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: String);
    fn delete(&self, key: &str) -> bool;
    /// All keys, in ascending order.
    fn keys(&self) -> Vec<String>;
}

/// A process-memory datastore.
pub struct MemoryDatastore {
    name: String,
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryDatastore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Datastore for MemoryDatastore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: String) {
        self.entries.lock().insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

impl fmt::Debug for MemoryDatastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDatastore")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Holds the datastore provider currently visible to application code.
///
/// The slot keeps its base provider plus a stack of active overrides. Each
/// guard removes only its own entry, so overlapping runs may finish in any
/// order and the base is visible again once every guard is gone.
///
/// 槽保存基础提供者以及一个活动覆盖栈。每个 guard 只移除它自己的条目，
/// 因此重叠的运行可以按任意顺序结束，所有 guard 消失后基础提供者重新可见。
pub struct StorageSlot {
    layers: RwLock<Layers>,
    next_id: AtomicU64,
}

struct Layers {
    base: Arc<dyn Datastore>,
    overrides: Vec<(u64, Arc<dyn Datastore>)>,
}

impl StorageSlot {
    pub fn new(base: Arc<dyn Datastore>) -> Self {
        Self {
            layers: RwLock::new(Layers {
                base,
                overrides: Vec::new(),
            }),
            next_id: AtomicU64::new(0),
        }
    }

    /// The newest active override, or the base provider when there is none.
    pub fn current(&self) -> Arc<dyn Datastore> {
        let layers = self.layers.read();
        layers
            .overrides
            .last()
            .map(|(_, provider)| Arc::clone(provider))
            .unwrap_or_else(|| Arc::clone(&layers.base))
    }

    /// The provider visible when no override is active.
    pub fn base(&self) -> Arc<dyn Datastore> {
        Arc::clone(&self.layers.read().base)
    }

    /// Number of overrides currently installed.
    pub fn active_overrides(&self) -> usize {
        self.layers.read().overrides.len()
    }

    /// Installs `provider` until the returned guard is dropped.
    pub fn scoped(self: &Arc<Self>, provider: Arc<dyn Datastore>) -> ScopedDatastore {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.layers.write().overrides.push((id, provider));
        ScopedDatastore {
            slot: Arc::clone(self),
            id,
        }
    }

    fn remove(&self, id: u64) {
        self.layers.write().overrides.retain(|(entry, _)| *entry != id);
    }
}

/// Removes its override from the slot on drop.
///
/// 在被丢弃时从槽中移除其覆盖。
#[must_use = "the override is removed as soon as the guard is dropped"]
pub struct ScopedDatastore {
    slot: Arc<StorageSlot>,
    id: u64,
}

impl Drop for ScopedDatastore {
    fn drop(&mut self) {
        self.slot.remove(self.id);
    }
}

static AMBIENT: Lazy<Arc<StorageSlot>> = Lazy::new(|| {
    Arc::new(StorageSlot::new(Arc::new(MemoryDatastore::new("development"))))
});

/// The process-wide slot used by the stock server and the bundled sample app.
pub fn ambient() -> Arc<StorageSlot> {
    Arc::clone(&AMBIENT)
}

/// Shorthand for `ambient().current()`.
pub fn current() -> Arc<dyn Datastore> {
    AMBIENT.current()
}
