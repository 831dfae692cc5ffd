//! 删除安全检查
//!
//! 把受保护路径表和已安装应用索引组合起来，对任意路径给出能否删除的结论和风险提示。
//! 任何无法确认的情况都按拒绝处理。

pub mod index;
pub mod models;
pub mod registry;

use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::modules::common::config::YuConfig;
use crate::modules::common::utils;
use crate::modules::lister::models::InstalledApp;
use crate::modules::lister::{AppInventory, SystemInventory};
use index::InstalledApplicationIndex;
use models::{DeletionAdvice, DeletionRiskLevel, SafetyVerdict};
use registry::ProtectedPathSet;

/// 模糊匹配的最小长度，避免短字符串误判
pub const MIN_FUZZY_MATCH_LEN: usize = 5;

/// 最近修改过的偏好设置视为仍在使用
pub const PREFERENCE_RECENCY_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// 运行进程列表的复用时间，避免逐条检查时反复枚举进程
const RUNNING_SNAPSHOT_TTL: Duration = Duration::from_secs(2);

/// 按应用划分数据的目录，所属应用仍安装时其内容受保护
const APP_DATA_BASES: &[&str] = &[
    "~/Library/Containers",
    "~/Library/Group Containers",
    "~/Library/Application Support",
];

const PREFERENCE_DIR_NAMES: &[&str] = &["preferences", "byhost"];

const LOW_RISK_DIR_NAMES: &[&str] = &["caches", "logs"];

struct RunningSnapshot {
    taken_at: Instant,
    apps: Arc<Vec<InstalledApp>>,
}

pub struct SafetyGuard {
    homes: Vec<PathBuf>,
    protected: ProtectedPathSet,
    inventory: Arc<dyn AppInventory>,
    index: InstalledApplicationIndex,
    running: Mutex<Option<RunningSnapshot>>,
}

impl SafetyGuard {
    /// 使用本机真实应用清单
    pub fn new(config: &YuConfig) -> Self {
        Self::with_inventory(config, Arc::new(SystemInventory::new(config)))
    }

    pub fn with_inventory(config: &YuConfig, inventory: Arc<dyn AppInventory>) -> Self {
        let homes = protected_homes(&config.home_dir);

        Self {
            protected: ProtectedPathSet::for_homes(&homes),
            homes,
            index: InstalledApplicationIndex::new(Arc::clone(&inventory), config.index_ttl),
            inventory,
            running: Mutex::new(None),
        }
    }

    pub fn index(&self) -> &InstalledApplicationIndex {
        &self.index
    }

    /// 安装/卸载后由外部调用，下一次查询会重新扫描
    pub fn invalidate_cache(&self) {
        self.index.invalidate();
        *self
            .running
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    pub fn is_safe_to_delete(&self, path: &Path) -> bool {
        let verdict = self.safety_verdict(path);
        if let Some(reason) = verdict.denial_reason() {
            tracing::debug!("拒绝删除 {}: {}", path.display(), reason);
        }
        verdict.is_deletable()
    }

    /// 按固定顺序检查，首个拒绝条件生效
    pub fn safety_verdict(&self, path: &Path) -> SafetyVerdict {
        if !path.is_absolute() {
            return SafetyVerdict::Unverifiable {
                reason: "不是绝对路径".to_string(),
            };
        }

        // `..` 会绕过前缀比较
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return SafetyVerdict::Unverifiable {
                reason: "路径包含上级目录引用".to_string(),
            };
        }

        // 上级目录中的符号链接可能指向受保护位置，原始路径和解析后的路径都要检查
        let resolved = match resolve_parent(path) {
            Ok(resolved) => resolved,
            Err(e) => {
                return SafetyVerdict::Unverifiable {
                    reason: format!("无法解析上级目录: {}", e),
                }
            }
        };
        let candidates: Vec<&Path> = if resolved.as_path() == path {
            vec![path]
        } else {
            vec![path, resolved.as_path()]
        };

        if candidates.iter().any(|p| self.protected.contains(p)) {
            return SafetyVerdict::Protected;
        }

        match has_immutable_flag(path) {
            Ok(true) => return SafetyVerdict::Immutable,
            Ok(false) => {}
            Err(e) => {
                return SafetyVerdict::Unverifiable {
                    reason: e.to_string(),
                }
            }
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if registry::is_whitelisted_preference(&file_name)
            && candidates.iter().any(|p| is_in_preferences_dir(p))
        {
            return SafetyVerdict::SystemPreference;
        }

        if let Some(owner) = candidates
            .iter()
            .find_map(|p| self.installed_app_data_owner(p))
        {
            return SafetyVerdict::InUse { owner };
        }

        if let Some(pattern) = registry::matching_critical_pattern(&file_name) {
            return SafetyVerdict::AllowedCriticalApp {
                pattern: pattern.to_string(),
            };
        }

        SafetyVerdict::Allowed
    }

    /// 风险等级和说明
    pub fn get_deletion_advice(&self, path: &Path) -> DeletionAdvice {
        let verdict = self.safety_verdict(path);

        if let Some(reason) = verdict.denial_reason() {
            return DeletionAdvice {
                risk: DeletionRiskLevel::Critical,
                message: format!("禁止删除: {}", reason),
            };
        }

        if let SafetyVerdict::AllowedCriticalApp { pattern } = &verdict {
            return DeletionAdvice {
                risk: DeletionRiskLevel::High,
                message: format!(
                    "属于关键应用 ({}) 的配置，删除后该应用的设置和数据将丢失",
                    pattern
                ),
            };
        }

        if is_in_low_risk_location(path) {
            return DeletionAdvice {
                risk: DeletionRiskLevel::Low,
                message: "缓存或日志文件，删除后会自动重新生成".to_string(),
            };
        }

        DeletionAdvice {
            risk: DeletionRiskLevel::Medium,
            message: "建议先移到废纸篓而不是永久删除".to_string(),
        }
    }

    /// 应用是否仍安装或正在运行
    ///
    /// 任意一个正向信号都视为已安装。
    pub fn is_application_installed(&self, identifier: &str) -> bool {
        let needle = identifier.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }

        // 正在运行（精确匹配标识或名称）
        let running = self.running_apps();
        let is_running = running.iter().any(|app| {
            app.name.to_lowercase() == needle
                || app
                    .bundle_identifier
                    .as_ref()
                    .map(|id| id.to_lowercase() == needle)
                    .unwrap_or(false)
        });
        if is_running {
            return true;
        }

        // 索引精确匹配
        let snapshot = self.index.get();
        if snapshot.contains(&needle) {
            return true;
        }

        // 子串模糊匹配，两侧都需达到最小长度
        if needle.len() >= MIN_FUZZY_MATCH_LEN {
            let fuzzy = snapshot.iter().any(|token| {
                token.len() >= MIN_FUZZY_MATCH_LEN
                    && (token.contains(needle.as_str()) || needle.contains(token.as_str()))
            });
            if fuzzy {
                return true;
            }
        }

        needle.starts_with(registry::RESERVED_VENDOR_PREFIX)
    }

    /// 偏好设置文件是否已成为孤立文件
    pub fn is_preference_orphaned(&self, path: &Path) -> bool {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => return false,
        };

        if registry::is_whitelisted_preference(&file_name) {
            return false;
        }

        if file_name
            .to_lowercase()
            .starts_with(registry::RESERVED_VENDOR_PREFIX)
        {
            return false;
        }

        match modified_age(path) {
            Some(age) if age >= PREFERENCE_RECENCY_WINDOW => {}
            // 最近修改过或无法读取修改时间
            _ => return false,
        }

        let identity = strip_plist_suffix(&file_name);
        !self.is_application_installed(identity)
    }

    fn running_apps(&self) -> Arc<Vec<InstalledApp>> {
        let mut running = self
            .running
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(snapshot) = running.as_ref() {
            if snapshot.taken_at.elapsed() < RUNNING_SNAPSHOT_TTL {
                return Arc::clone(&snapshot.apps);
            }
        }

        let apps = Arc::new(self.inventory.running_apps());
        *running = Some(RunningSnapshot {
            taken_at: Instant::now(),
            apps: Arc::clone(&apps),
        });
        apps
    }

    /// 路径位于某应用的容器/支持目录且该应用仍安装时，返回应用目录名
    ///
    /// 缓存、临时、日志子目录除外。
    fn installed_app_data_owner(&self, path: &Path) -> Option<String> {
        let normalized = utils::normalize_path(path);

        let bases = self
            .homes
            .iter()
            .flat_map(|home| APP_DATA_BASES.iter().map(move |base| utils::expand_tilde(base, home)));

        for base_path in bases {
            let base_normalized = utils::normalize_path(&base_path);

            if !normalized.starts_with(&format!("{}/", base_normalized)) {
                continue;
            }

            let depth = base_path.components().count();
            let rest: Vec<String> = path
                .components()
                .skip(depth)
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();

            let owner = rest.first()?.clone();
            if !self.is_application_installed(&owner) {
                return None;
            }

            if rest.iter().skip(1).any(|name| registry::is_safe_subdirectory(name)) {
                return None;
            }

            return Some(owner);
        }

        None
    }
}

#[cfg(target_os = "macos")]
fn has_immutable_flag(path: &Path) -> std::io::Result<bool> {
    use std::os::macos::fs::MetadataExt;

    match std::fs::symlink_metadata(path) {
        Ok(metadata) => {
            let flags = metadata.st_flags();
            Ok(flags & (libc::UF_IMMUTABLE | libc::SF_IMMUTABLE) != 0)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// 其他平台没有 BSD 文件标志，只确认元数据可读
#[cfg(not(target_os = "macos"))]
fn has_immutable_flag(path: &Path) -> std::io::Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn is_in_preferences_dir(path: &Path) -> bool {
    path.parent()
        .map(|parent| {
            let name = utils::file_name_lower(parent);
            PREFERENCE_DIR_NAMES.contains(&name.as_str())
        })
        .unwrap_or(false)
}

fn is_in_low_risk_location(path: &Path) -> bool {
    path.components().any(|c| {
        let name = c.as_os_str().to_string_lossy().to_lowercase();
        LOW_RISK_DIR_NAMES.contains(&name.as_str())
    })
}

fn modified_age(path: &Path) -> Option<Duration> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    modified.elapsed().ok()
}

fn strip_plist_suffix(file_name: &str) -> &str {
    let split = match file_name.len().checked_sub(".plist".len()) {
        Some(split) if split > 0 => split,
        _ => return file_name,
    };

    // 按字节切分可能落在多字节字符中间
    match (file_name.get(..split), file_name.get(split..)) {
        (Some(stem), Some(suffix)) if suffix.eq_ignore_ascii_case(".plist") => stem,
        _ => file_name,
    }
}

/// 配置的主目录、当前用户的真实主目录，以及它们解析符号链接后的路径
fn protected_homes(configured: &Path) -> Vec<PathBuf> {
    let mut homes = vec![configured.to_path_buf()];
    homes.extend(dirs::home_dir());

    let canonical: Vec<PathBuf> = homes
        .iter()
        .filter_map(|home| std::fs::canonicalize(home).ok())
        .collect();
    homes.extend(canonical);

    homes.sort();
    homes.dedup();
    homes
}

/// 解析上级目录中的符号链接，最后一个组件保持原样
///
/// 上级目录不存在时返回原路径，此时没有可删除的对象。
fn resolve_parent(path: &Path) -> std::io::Result<PathBuf> {
    let (parent, name) = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => (parent, name),
        _ => return Ok(path.to_path_buf()),
    };

    match std::fs::canonicalize(parent) {
        Ok(parent) => Ok(parent.join(name)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::lister::models::InstallSource;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeInventory {
        installed: Mutex<Vec<InstalledApp>>,
        running: Mutex<Vec<InstalledApp>>,
        installed_calls: AtomicUsize,
    }

    impl FakeInventory {
        fn install(&self, name: &str, identifier: &str) {
            self.installed.lock().unwrap().push(
                InstalledApp::new(name, InstallSource::Bundle).with_bundle_identifier(identifier),
            );
        }

        fn run(&self, name: &str, identifier: Option<&str>) {
            let mut app = InstalledApp::new(name, InstallSource::Running);
            if let Some(id) = identifier {
                app = app.with_bundle_identifier(id);
            }
            self.running.lock().unwrap().push(app);
        }
    }

    impl AppInventory for FakeInventory {
        fn installed_apps(&self) -> Vec<InstalledApp> {
            self.installed_calls.fetch_add(1, Ordering::SeqCst);
            self.installed.lock().unwrap().clone()
        }

        fn running_apps(&self) -> Vec<InstalledApp> {
            self.running.lock().unwrap().clone()
        }
    }

    struct Fixture {
        home: PathBuf,
        inventory: Arc<FakeInventory>,
        guard: SafetyGuard,
    }

    impl Fixture {
        fn new(test_name: &str) -> Self {
            let home = std::env::temp_dir().join(format!(
                "rust-yu-guard-test-{}-{}",
                test_name,
                uuid::Uuid::new_v4()
            ));
            assert!(fs::create_dir_all(home.join("Library").join("Preferences")).is_ok());

            let inventory = Arc::new(FakeInventory::default());
            let config = YuConfig::for_home(home.clone());
            let guard = SafetyGuard::with_inventory(&config, inventory.clone());

            Self {
                home,
                inventory,
                guard,
            }
        }

        fn library(&self, relative: &str) -> PathBuf {
            self.home.join("Library").join(relative)
        }

        fn touch(&self, path: &Path) {
            if let Some(parent) = path.parent() {
                assert!(fs::create_dir_all(parent).is_ok());
            }
            assert!(fs::write(path, b"data").is_ok());
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.home);
        }
    }

    fn set_modified_days_ago(path: &Path, days: u64) {
        let file = fs::OpenOptions::new().write(true).open(path).unwrap();
        let when = std::time::SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
        file.set_modified(when).unwrap();
    }

    #[test]
    fn protected_prefixes_are_never_safe() {
        let fx = Fixture::new("protected");

        let keychain = fx.library("Keychains/login.keychain-db");
        fx.touch(&keychain);

        assert!(!fx.guard.is_safe_to_delete(&keychain));
        assert!(!fx.guard.is_safe_to_delete(Path::new("/System/Library/Kernels")));
        assert!(!fx.guard.is_safe_to_delete(Path::new("/usr/lib/libSystem.B.dylib")));
        assert!(!fx
            .guard
            .is_safe_to_delete(&fx.library("Mobile Documents/com~apple~CloudDocs/a.txt")));
        assert!(!fx.guard.is_safe_to_delete(&fx.home));
        assert!(!fx.guard.is_safe_to_delete(&fx.library("Preferences")));
    }

    #[test]
    fn relative_and_parent_paths_are_denied() {
        let fx = Fixture::new("relative");

        assert!(!fx.guard.is_safe_to_delete(Path::new("Library/Caches/foo")));

        let sneaky = fx.library("Caches/../Keychains");
        assert!(matches!(
            fx.guard.safety_verdict(&sneaky),
            SafetyVerdict::Unverifiable { .. }
        ));
    }

    #[test]
    fn whitelisted_preference_in_preferences_dir_is_denied_and_not_orphaned() {
        let fx = Fixture::new("whitelist");

        let finder = fx.library("Preferences/com.apple.finder.plist");
        fx.touch(&finder);
        set_modified_days_ago(&finder, 30);

        assert_eq!(fx.guard.safety_verdict(&finder), SafetyVerdict::SystemPreference);
        assert!(!fx.guard.is_safe_to_delete(&finder));
        assert!(!fx.guard.is_preference_orphaned(&finder));

        let global = fx.library("Preferences/.GlobalPreferences.plist");
        fx.touch(&global);
        assert!(!fx.guard.is_safe_to_delete(&global));
    }

    #[test]
    fn orphaned_third_party_preference_is_safe() {
        let fx = Fixture::new("orphan");

        let plist = fx.library("Preferences/com.bar.gone.plist");
        fx.touch(&plist);
        set_modified_days_ago(&plist, 30);

        assert!(fx.guard.is_safe_to_delete(&plist));
        assert!(fx.guard.is_preference_orphaned(&plist));
    }

    #[test]
    fn recently_modified_preference_is_not_orphaned() {
        let fx = Fixture::new("recent");

        let plist = fx.library("Preferences/com.bar.gone.plist");
        fx.touch(&plist);
        set_modified_days_ago(&plist, 6);
        assert!(!fx.guard.is_preference_orphaned(&plist));

        set_modified_days_ago(&plist, 8);
        assert!(fx.guard.is_preference_orphaned(&plist));
    }

    #[test]
    fn installed_app_preference_is_not_orphaned() {
        let fx = Fixture::new("installed-pref");
        fx.inventory.install("Foo", "com.bar.foo");

        let plist = fx.library("Preferences/com.bar.foo.plist");
        fx.touch(&plist);
        set_modified_days_ago(&plist, 30);

        assert!(!fx.guard.is_preference_orphaned(&plist));
    }

    #[test]
    fn vendor_prefixed_and_missing_preferences_are_not_orphaned() {
        let fx = Fixture::new("vendor-pref");

        let plist = fx.library("Preferences/com.apple.somethingnew.plist");
        fx.touch(&plist);
        set_modified_days_ago(&plist, 30);
        assert!(!fx.guard.is_preference_orphaned(&plist));

        assert!(!fx
            .guard
            .is_preference_orphaned(&fx.library("Preferences/com.bar.missing.plist")));
    }

    #[test]
    fn installed_app_container_is_denied_except_safe_subdirectories() {
        let fx = Fixture::new("container");
        fx.inventory.install("Foo", "com.bar.foo");

        let container = fx.library("Containers/com.bar.foo");
        let data = container.join("Data/Library/Application Support/db.sqlite");
        let cache = container.join("Data/Library/Caches/blob");
        fx.touch(&data);
        fx.touch(&cache);

        assert_eq!(
            fx.guard.safety_verdict(&container),
            SafetyVerdict::InUse {
                owner: "com.bar.foo".to_string()
            }
        );
        assert!(!fx.guard.is_safe_to_delete(&data));
        assert!(fx.guard.is_safe_to_delete(&cache));
    }

    #[test]
    fn uninstalled_app_support_is_allowed() {
        let fx = Fixture::new("support");

        let support = fx.library("Application Support/GoneApp");
        fx.touch(&support.join("state.json"));

        assert!(fx.guard.is_safe_to_delete(&support));
        assert_eq!(
            fx.guard.get_deletion_advice(&support).risk,
            DeletionRiskLevel::Medium
        );
    }

    #[test]
    fn critical_app_pattern_is_allowed_but_flagged_high() {
        let fx = Fixture::new("critical");

        let plist = fx.library("Preferences/com.jetbrains.intellij.plist");
        fx.touch(&plist);

        assert!(fx.guard.is_safe_to_delete(&plist));
        assert!(matches!(
            fx.guard.safety_verdict(&plist),
            SafetyVerdict::AllowedCriticalApp { .. }
        ));
        assert_eq!(
            fx.guard.get_deletion_advice(&plist).risk,
            DeletionRiskLevel::High
        );
    }

    #[test]
    fn advice_levels_follow_verdicts() {
        let fx = Fixture::new("advice");

        let cache = fx.library("Caches/com.bar.gone");
        fx.touch(&cache.join("blob"));
        let log = fx.library("Logs/GoneApp/app.log");
        fx.touch(&log);

        assert_eq!(fx.guard.get_deletion_advice(&cache).risk, DeletionRiskLevel::Low);
        assert_eq!(fx.guard.get_deletion_advice(&log).risk, DeletionRiskLevel::Low);
        assert_eq!(
            fx.guard
                .get_deletion_advice(&fx.library("Keychains/login.keychain-db"))
                .risk,
            DeletionRiskLevel::Critical
        );
    }

    #[test]
    fn running_app_counts_as_installed_case_insensitively() {
        let fx = Fixture::new("running");
        fx.inventory.run("Foo Helper", Some("com.Bar.Foo-Helper"));

        assert!(fx.guard.is_application_installed("COM.BAR.FOO-HELPER"));
        assert!(fx.guard.is_application_installed("foo helper"));
        assert!(!fx.guard.is_application_installed("com.other.thing"));
    }

    #[test]
    fn fuzzy_match_requires_five_characters() {
        let fx = Fixture::new("fuzzy");
        fx.inventory.install("Zotero", "org.zotero.zotero");

        // 4 个字符不做模糊匹配
        assert!(!fx.guard.is_application_installed("oter"));
        // 5 个字符可以模糊匹配
        assert!(fx.guard.is_application_installed("otero"));
        // 标识包含已安装标识
        assert!(fx
            .guard
            .is_application_installed("group.org.zotero.zotero.shared"));
    }

    #[test]
    fn reserved_vendor_prefix_is_always_installed() {
        let fx = Fixture::new("vendor");
        assert!(fx.guard.is_application_installed("com.apple.unknownthing"));
        assert!(!fx.guard.is_application_installed(""));
    }

    #[test]
    fn invalidate_cache_forces_fresh_scan() {
        let fx = Fixture::new("invalidate");

        assert!(!fx.guard.is_application_installed("com.bar.newapp"));
        let before = fx.guard.index().rebuild_count();

        fx.inventory.install("NewApp", "com.bar.newapp");
        // 有效期内仍使用旧快照
        assert!(!fx.guard.is_application_installed("com.bar.newapp"));
        assert_eq!(fx.guard.index().rebuild_count(), before);

        fx.guard.invalidate_cache();
        assert!(fx.guard.is_application_installed("com.bar.newapp"));
        assert_eq!(fx.guard.index().rebuild_count(), before + 1);
        assert_eq!(fx.inventory.installed_calls.load(Ordering::SeqCst), 2);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_metadata_is_denied() {
        use std::os::unix::fs::PermissionsExt;

        let fx = Fixture::new("unreadable");
        let locked = fx.library("Caches/locked");
        fx.touch(&locked.join("inner"));
        assert!(fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).is_ok());

        let inner = locked.join("inner");
        // root 可以绕过权限，此时检查无意义
        let readable_anyway = fs::symlink_metadata(&inner).is_ok();
        if !readable_anyway {
            assert!(!fx.guard.is_safe_to_delete(&inner));
        }

        let _ = fs::set_permissions(&locked, fs::Permissions::from_mode(0o755));
    }

    #[test]
    fn strip_plist_suffix_ignores_case() {
        assert_eq!(strip_plist_suffix("com.bar.foo.plist"), "com.bar.foo");
        assert_eq!(strip_plist_suffix("com.bar.foo.PLIST"), "com.bar.foo");
        assert_eq!(strip_plist_suffix(".plist"), ".plist");
        assert_eq!(strip_plist_suffix("foo"), "foo");
    }

    #[test]
    fn strip_plist_suffix_handles_multibyte_names() {
        assert_eq!(strip_plist_suffix("ab日日x"), "ab日日x");
        assert_eq!(strip_plist_suffix("设置.plist"), "设置");
        assert_eq!(strip_plist_suffix("日日日"), "日日日");
    }

    #[test]
    fn multibyte_preference_name_is_checked_without_panic() {
        let fx = Fixture::new("multibyte");
        let pref = fx.library("Preferences/ab日日x");
        fx.touch(&pref);
        set_modified_days_ago(&pref, 30);

        assert!(fx.guard.is_preference_orphaned(&pref));
    }

    #[test]
    fn parent_of_protected_location_is_denied() {
        let fx = Fixture::new("ancestor");
        let cookies = fx.library("Application Support/Google/Chrome/Default/Cookies");
        fx.touch(&cookies);

        let google = fx.library("Application Support/Google");
        assert_eq!(fx.guard.safety_verdict(&google), SafetyVerdict::Protected);
        assert!(!fx.guard.is_safe_to_delete(&fx.library("Application Support")));
        assert!(!fx.guard.is_safe_to_delete(Path::new("/private/var")));
        assert!(!fx.guard.is_safe_to_delete(Path::new("/Volumes")));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_parent_into_protected_location_is_denied() {
        let fx = Fixture::new("symlink-protected");
        let keychain = fx.library("Keychains/login.keychain-db");
        fx.touch(&keychain);

        assert!(fs::create_dir_all(fx.library("Caches")).is_ok());
        let link = fx.library("Caches/evil");
        assert!(std::os::unix::fs::symlink(fx.library("Keychains"), &link).is_ok());

        let via_link = link.join("login.keychain-db");
        assert_eq!(fx.guard.safety_verdict(&via_link), SafetyVerdict::Protected);
        assert!(!fx.guard.is_safe_to_delete(&via_link));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_parent_into_installed_container_is_denied() {
        let fx = Fixture::new("symlink-container");
        fx.inventory.install("Foo", "com.bar.foo");
        fx.touch(&fx.library("Containers/com.bar.foo/Data/db.sqlite"));

        assert!(fs::create_dir_all(fx.library("Caches")).is_ok());
        let link = fx.library("Caches/shortcut");
        assert!(std::os::unix::fs::symlink(fx.library("Containers/com.bar.foo"), &link).is_ok());

        assert!(matches!(
            fx.guard.safety_verdict(&link.join("Data")),
            SafetyVerdict::InUse { .. }
        ));
    }

    #[test]
    fn real_home_stays_protected_with_overridden_home() {
        let fx = Fixture::new("real-home");

        if let Some(real_home) = dirs::home_dir() {
            let keychain = real_home.join("Library/Keychains/login.keychain-db");
            assert!(!fx.guard.is_safe_to_delete(&keychain));
            assert!(!fx.guard.is_safe_to_delete(&real_home.join(".ssh/id_ed25519")));
            assert!(!fx.guard.is_safe_to_delete(&real_home));
        }
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn user_immutable_flag_is_denied() {
        let fx = Fixture::new("immutable");
        let locked = fx.library("Caches/Foo/locked.db");
        fx.touch(&locked);

        let flagged = std::process::Command::new("chflags")
            .arg("uchg")
            .arg(&locked)
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        assert!(flagged);

        assert_eq!(fx.guard.safety_verdict(&locked), SafetyVerdict::Immutable);
        assert!(!fx.guard.is_safe_to_delete(&locked));

        let _ = std::process::Command::new("chflags")
            .arg("nouchg")
            .arg(&locked)
            .status();
    }
}
