//! 已安装应用索引
//!
//! 保存小写标识集合和构建时间，超过有效期或被显式失效后在下一次读取时同步重建。
//! 重建期间持有锁，读取方会等待重建完成，不会看到构建到一半的索引。

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::modules::lister::models::InstalledApp;
use crate::modules::lister::AppInventory;

use super::registry::VENDOR_SAFE_LIST;

/// 标识中长度超过该值的分段才会单独加入索引
pub const MIN_COMPONENT_LEN: usize = 3;

#[derive(Debug, Default)]
struct IndexState {
    snapshot: Arc<HashSet<String>>,
    built_at: Option<Instant>,
}

pub struct InstalledApplicationIndex {
    inventory: Arc<dyn AppInventory>,
    ttl: Duration,
    state: Mutex<IndexState>,
    rebuilds: AtomicU64,
}

impl InstalledApplicationIndex {
    pub fn new(inventory: Arc<dyn AppInventory>, ttl: Duration) -> Self {
        Self {
            inventory,
            ttl,
            state: Mutex::new(IndexState::default()),
            rebuilds: AtomicU64::new(0),
        }
    }

    /// 取当前快照，过期时先同步重建
    pub fn get(&self) -> Arc<HashSet<String>> {
        let mut state = self.lock_state();

        let fresh = state
            .built_at
            .map(|built_at| built_at.elapsed() < self.ttl)
            .unwrap_or(false);

        if !fresh {
            let started = Instant::now();
            let snapshot = build_snapshot(
                &self.inventory.installed_apps(),
                &self.inventory.running_apps(),
            );
            tracing::debug!(
                "已重建应用索引: {} 个标识, 耗时 {:?}",
                snapshot.len(),
                started.elapsed()
            );

            state.snapshot = Arc::new(snapshot);
            state.built_at = Some(Instant::now());
            self.rebuilds.fetch_add(1, Ordering::SeqCst);
        }

        Arc::clone(&state.snapshot)
    }

    /// 使缓存失效（安装/卸载之后调用）
    pub fn invalidate(&self) {
        let mut state = self.lock_state();
        state.built_at = None;
        tracing::debug!("应用索引已失效");
    }

    /// 最近一次构建时间
    pub fn built_at(&self) -> Option<Instant> {
        self.lock_state().built_at
    }

    /// 累计重建次数
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::SeqCst)
    }

    fn lock_state(&self) -> MutexGuard<'_, IndexState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// 由应用清单、运行进程和静态白名单构建标识集合
pub fn build_snapshot(installed: &[InstalledApp], running: &[InstalledApp]) -> HashSet<String> {
    let mut tokens = HashSet::new();

    for app in installed.iter().chain(running.iter()) {
        insert_app_tokens(&mut tokens, app);
    }

    for vendor in VENDOR_SAFE_LIST {
        tokens.insert(vendor.to_string());
    }

    tokens
}

fn insert_app_tokens(tokens: &mut HashSet<String>, app: &InstalledApp) {
    let name = app.name.trim().to_lowercase();
    if !name.is_empty() {
        tokens.insert(name);
    }

    if let Some(identifier) = &app.bundle_identifier {
        let identifier = identifier.trim().to_lowercase();
        if identifier.is_empty() {
            return;
        }

        for component in identifier_components(&identifier) {
            tokens.insert(component.to_string());
        }
        tokens.insert(identifier);
    }
}

/// 标识中长度超过 3 的分段
pub fn identifier_components(identifier: &str) -> impl Iterator<Item = &str> {
    identifier
        .split('.')
        .filter(|component| component.len() > MIN_COMPONENT_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::lister::models::InstallSource;
    use std::sync::atomic::AtomicUsize;

    struct CountingInventory {
        calls: AtomicUsize,
    }

    impl AppInventory for CountingInventory {
        fn installed_apps(&self) -> Vec<InstalledApp> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![InstalledApp::new("Foo", InstallSource::Bundle)
                .with_bundle_identifier("com.bar.FooApp")]
        }

        fn running_apps(&self) -> Vec<InstalledApp> {
            vec![InstalledApp::new("daemonx", InstallSource::Running)]
        }
    }

    fn counting_index(ttl: Duration) -> (Arc<CountingInventory>, InstalledApplicationIndex) {
        let inventory = Arc::new(CountingInventory {
            calls: AtomicUsize::new(0),
        });
        let index = InstalledApplicationIndex::new(inventory.clone(), ttl);
        (inventory, index)
    }

    #[test]
    fn snapshot_contains_names_identifiers_and_long_components() {
        let installed = vec![InstalledApp::new("Foo", InstallSource::Bundle)
            .with_bundle_identifier("com.bar.FooApp")];
        let snapshot = build_snapshot(&installed, &[]);

        assert!(snapshot.contains("foo"));
        assert!(snapshot.contains("com.bar.fooapp"));
        assert!(snapshot.contains("fooapp"));
        // 长度不超过 3 的分段不单独加入
        assert!(!snapshot.contains("com"));
        assert!(!snapshot.contains("bar"));
        assert!(snapshot.contains("com.apple.finder"));
    }

    #[test]
    fn get_reuses_fresh_snapshot() {
        let (inventory, index) = counting_index(Duration::from_secs(300));

        let first = index.get();
        let second = index.get();

        assert!(first.contains("daemonx"));
        assert_eq!(first, second);
        assert_eq!(inventory.calls.load(Ordering::SeqCst), 1);
        assert_eq!(index.rebuild_count(), 1);
    }

    #[test]
    fn invalidate_forces_rebuild_within_ttl() {
        let (inventory, index) = counting_index(Duration::from_secs(300));

        index.get();
        let first_built = index.built_at();
        index.invalidate();
        assert!(index.built_at().is_none());

        index.get();
        assert_eq!(inventory.calls.load(Ordering::SeqCst), 2);
        assert_eq!(index.rebuild_count(), 2);
        assert!(index.built_at() >= first_built);
    }

    #[test]
    fn expired_snapshot_is_rebuilt() {
        let (inventory, index) = counting_index(Duration::from_millis(1));

        index.get();
        std::thread::sleep(Duration::from_millis(5));
        index.get();

        assert_eq!(inventory.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_readers_share_a_single_rebuild() {
        let (inventory, index) = counting_index(Duration::from_secs(300));
        let index = Arc::new(index);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let index = Arc::clone(&index);
                std::thread::spawn(move || index.get().len())
            })
            .collect();

        let sizes: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().unwrap_or_default())
            .collect();

        assert!(sizes.iter().all(|size| *size == sizes[0] && *size > 0));
        assert_eq!(inventory.calls.load(Ordering::SeqCst), 1);
    }
}
