//! 受保护路径、系统偏好设置白名单和关键应用模式
//!
//! 所有比较都按小写进行，宁可多保护也不能漏保护。

use std::path::{Path, PathBuf};

use crate::modules::common::utils;

/// 禁止扫描和删除的目录前缀
pub const PROTECTED_PATHS: &[&str] = &[
    // 系统目录
    "/System",
    "/bin",
    "/sbin",
    "/usr",
    "/private/etc",
    "/private/var/db",
    "/var/db",
    "/etc",
    "/Library/Apple",
    "/Library/Keychains",
    "/Library/Security",
    "/Library/SystemMigration",
    // 钥匙串与凭据
    "~/Library/Keychains",
    "~/Library/Application Support/com.apple.TCC",
    "~/Library/Application Support/1Password",
    "~/Library/Group Containers/2BUA8C4S2C.com.1password",
    "~/Library/Application Support/Bitwarden",
    "~/Library/Application Support/KeePassXC",
    "~/Library/Application Support/LastPass",
    "~/Library/Application Support/Dashlane",
    "~/.ssh",
    "~/.gnupg",
    // 浏览器配置与数据库
    "~/Library/Safari",
    "~/Library/Containers/com.apple.Safari",
    "~/Library/Application Support/Google/Chrome",
    "~/Library/Application Support/Firefox/Profiles",
    "~/Library/Application Support/BraveSoftware",
    "~/Library/Application Support/Microsoft Edge",
    "~/Library/Application Support/Arc",
    // 云同步根目录
    "~/Library/Mobile Documents",
    "~/Library/CloudStorage",
    "~/Library/Application Support/CloudDocs",
    "~/Dropbox",
    "~/Google Drive",
    "~/OneDrive",
    // 邮件、信息等个人数据
    "~/Library/Mail",
    "~/Library/Messages",
    "~/Library/Accounts",
    "~/Library/Calendars",
    "~/Library/Photos",
];

/// 本身不可整体删除的位置根目录（精确匹配）
pub const PROTECTED_ROOTS: &[&str] = &[
    "/",
    "/Applications",
    "/Library",
    "/Users",
    "/private",
    "/private/var",
    "/private/tmp",
    "/var",
    "/tmp",
    "/Volumes",
    "/Network",
    "/dev",
    "/cores",
    "/opt",
    "~",
    "~/Library",
    "~/Library/Preferences",
    "~/Library/Preferences/ByHost",
    "~/Library/Application Support",
    "~/Library/Caches",
    "~/Library/Logs",
    "~/Library/Logs/DiagnosticReports",
    "~/Library/Saved Application State",
    "~/Library/Containers",
    "~/Library/Group Containers",
    "~/Library/Cookies",
    "~/Library/LaunchAgents",
    "~/Library/Developer",
    "~/Applications",
    "~/Desktop",
    "~/Documents",
    "~/Downloads",
];

/// 系统及第一方组件的偏好设置文件，永远不视为孤立文件
pub const SYSTEM_PREFERENCE_WHITELIST: &[&str] = &[
    ".GlobalPreferences.plist",
    "com.apple.finder.plist",
    "com.apple.dock.plist",
    "com.apple.systempreferences.plist",
    "com.apple.systemsettings.plist",
    "com.apple.loginwindow.plist",
    "loginwindow.plist",
    "com.apple.spotlight.plist",
    "com.apple.screensaver.plist",
    "com.apple.screencapture.plist",
    "com.apple.security.plist",
    "com.apple.sharingd.plist",
    "com.apple.symbolichotkeys.plist",
    "com.apple.universalaccess.plist",
    "com.apple.HIToolbox.plist",
    "com.apple.driver.AppleBluetoothMultitouch.trackpad.plist",
    "com.apple.AppleMultitouchTrackpad.plist",
    "com.apple.menuextra.clock.plist",
    "com.apple.controlcenter.plist",
    "com.apple.LaunchServices.plist",
    "com.apple.ncprefs.plist",
    "com.apple.TimeMachine.plist",
    "com.apple.Safari.plist",
    "com.apple.mail.plist",
    "com.apple.iCal.plist",
    "com.apple.Terminal.plist",
    "com.apple.keyboard.plist",
    "com.apple.preference.general.plist",
    "com.apple.WindowManager.plist",
    "com.apple.desktopservices.plist",
    "pbs.plist",
];

/// 关键应用的标识前缀，匹配时给出高风险提示（不拒绝删除）
pub const CRITICAL_APP_PATTERNS: &[&str] = &[
    // 开发工具
    "com.jetbrains",
    "com.microsoft.vscode",
    "com.visualstudio",
    "com.sublimetext",
    "com.github",
    "com.docker",
    "com.apple.dt.xcode",
    "com.googlecode.iterm2",
    // 浏览器
    "com.google.chrome",
    "org.mozilla.firefox",
    "com.brave.browser",
    "com.microsoft.edgemac",
    "com.operasoftware",
    "company.thebrowser.browser",
    // 通讯
    "com.tinyspeck.slackmacgap",
    "com.hnc.discord",
    "ru.keepcoder.telegram",
    "net.whatsapp",
    "us.zoom",
    "com.microsoft.teams",
    "com.skype",
    // 办公
    "com.microsoft.office",
    "com.microsoft.word",
    "com.microsoft.excel",
    "com.microsoft.outlook",
];

/// 受保护应用目录内仍允许删除的子目录名（缓存、临时、日志）
pub const SAFE_SUBDIRECTORIES: &[&str] = &[
    "cache",
    "caches",
    "cachedata",
    "cachestorage",
    "code cache",
    "gpucache",
    "shadercache",
    "dawncache",
    "tmp",
    "temp",
    "temporary",
    "log",
    "logs",
];

/// 索引中始终视为已安装的系统/厂商标识
pub const VENDOR_SAFE_LIST: &[&str] = &[
    "com.apple.finder",
    "com.apple.dock",
    "com.apple.systemuiserver",
    "com.apple.systempreferences",
    "com.apple.systemsettings",
    "com.apple.loginwindow",
    "com.apple.spotlight",
    "com.apple.controlcenter",
    "com.apple.notificationcenterui",
    "com.apple.safari",
    "com.apple.mail",
    "com.apple.icloud",
    "com.apple.cloudkit",
    "com.apple.security",
    "com.apple.coreservices",
    "com.apple.launchservices",
    "com.apple.dt.xcode",
    "com.apple.terminal",
    "loginwindow",
    "windowserver",
    "launchd",
];

/// 操作系统厂商保留的标识前缀
pub const RESERVED_VENDOR_PREFIX: &str = "com.apple.";

/// 已展开的受保护路径集合
#[derive(Debug, Clone)]
pub struct ProtectedPathSet {
    prefixes: Vec<String>,
    roots: Vec<String>,
}

impl ProtectedPathSet {
    /// 以每个主目录分别展开 `~`
    pub fn for_homes(homes: &[PathBuf]) -> Self {
        let expand_all = |entries: &[&str]| {
            let mut expanded: Vec<String> = homes
                .iter()
                .flat_map(|home| {
                    entries
                        .iter()
                        .map(move |raw| utils::normalize_path(&utils::expand_tilde(raw, home)))
                })
                .collect();
            expanded.sort();
            expanded.dedup();
            expanded
        };

        Self {
            prefixes: expand_all(PROTECTED_PATHS),
            roots: expand_all(PROTECTED_ROOTS),
        }
    }

    /// 路径是否落在受保护前缀之下、本身是受保护根目录，或包含任一受保护位置
    pub fn contains(&self, path: &Path) -> bool {
        let normalized = utils::normalize_path(path);

        if self.roots.iter().any(|root| *root == normalized) {
            return true;
        }

        if self
            .prefixes
            .iter()
            .any(|prefix| normalized.starts_with(prefix.as_str()))
        {
            return true;
        }

        // 删除上级目录会连带删除其中的受保护位置
        let as_parent = if normalized.ends_with('/') {
            normalized
        } else {
            format!("{}/", normalized)
        };

        self.prefixes
            .iter()
            .chain(self.roots.iter())
            .any(|protected| protected.starts_with(as_parent.as_str()))
    }
}

/// 文件名是否在系统偏好设置白名单中
pub fn is_whitelisted_preference(file_name: &str) -> bool {
    SYSTEM_PREFERENCE_WHITELIST
        .iter()
        .any(|entry| entry.eq_ignore_ascii_case(file_name))
}

/// 文件名是否命中关键应用模式
pub fn matching_critical_pattern(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    CRITICAL_APP_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.starts_with(pattern))
}

/// 是否为缓存/临时/日志类子目录
pub fn is_safe_subdirectory(name: &str) -> bool {
    let lower = name.to_lowercase();
    SAFE_SUBDIRECTORIES.iter().any(|safe| *safe == lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/Users/demo")
    }

    #[test]
    fn protected_set_matches_prefixes_after_tilde_expansion() {
        let set = ProtectedPathSet::for_homes(&[home()]);

        assert!(set.contains(Path::new("/Users/demo/Library/Keychains/login.keychain-db")));
        assert!(set.contains(Path::new("/System/Library/CoreServices")));
        assert!(set.contains(Path::new(
            "/Users/demo/Library/Application Support/Google/Chrome/Default/Cookies"
        )));
        assert!(!set.contains(Path::new("/Users/demo/Library/Caches/com.bar.foo")));
    }

    #[test]
    fn protected_set_is_case_insensitive() {
        let set = ProtectedPathSet::for_homes(&[home()]);
        assert!(set.contains(Path::new("/users/DEMO/library/KEYCHAINS")));
        assert!(set.contains(Path::new("/SYSTEM/Library")));
    }

    #[test]
    fn protected_roots_match_exactly_only() {
        let set = ProtectedPathSet::for_homes(&[home()]);

        assert!(set.contains(Path::new("/Users/demo")));
        assert!(set.contains(Path::new("/Users/demo/Library/Preferences/")));
        assert!(set.contains(Path::new("/")));
        assert!(!set.contains(Path::new("/Users/demo/Library/Preferences/com.bar.foo.plist")));
    }

    #[test]
    fn ancestors_of_protected_locations_are_protected() {
        let set = ProtectedPathSet::for_homes(&[home()]);

        assert!(set.contains(Path::new(
            "/Users/demo/Library/Application Support/Google"
        )));
        assert!(set.contains(Path::new("/Users/demo/Library/Application Support/Firefox")));
        assert!(set.contains(Path::new("/private/var")));
        assert!(set.contains(Path::new("/Users")));
        assert!(!set.contains(Path::new(
            "/Users/demo/Library/Application Support/Googlex"
        )));
        assert!(!set.contains(Path::new("/Users/demo/Library/Caches/com.google.Keystone")));
    }

    #[test]
    fn system_mount_and_device_roots_are_protected() {
        let set = ProtectedPathSet::for_homes(&[home()]);

        for root in ["/Volumes", "/dev", "/cores", "/opt", "/private/var", "/tmp"] {
            assert!(set.contains(Path::new(root)), "{} 应受保护", root);
        }
        assert!(!set.contains(Path::new("/opt/homebrew/Caskroom/foo")));
        assert!(!set.contains(Path::new("/Volumes/External/foo.cache")));
    }

    #[test]
    fn every_home_is_expanded() {
        let set = ProtectedPathSet::for_homes(&[home(), PathBuf::from("/Users/real")]);

        assert!(set.contains(Path::new("/Users/demo/Library/Keychains/login.keychain-db")));
        assert!(set.contains(Path::new("/Users/real/Library/Keychains/login.keychain-db")));
        assert!(set.contains(Path::new("/Users/real/.ssh/id_ed25519")));
        assert!(set.contains(Path::new("/Users/real/Library/Preferences")));
        assert!(!set.contains(Path::new("/Users/real/Library/Caches/com.bar.foo")));
    }

    #[test]
    fn whitelist_lookup_ignores_case() {
        assert!(is_whitelisted_preference("com.apple.finder.plist"));
        assert!(is_whitelisted_preference("COM.APPLE.DOCK.PLIST"));
        assert!(!is_whitelisted_preference("com.bar.foo.plist"));
    }

    #[test]
    fn critical_patterns_match_by_prefix() {
        assert_eq!(
            matching_critical_pattern("com.jetbrains.intellij.plist"),
            Some("com.jetbrains")
        );
        assert_eq!(
            matching_critical_pattern("com.Google.Chrome.plist"),
            Some("com.google.chrome")
        );
        assert_eq!(matching_critical_pattern("com.bar.foo.plist"), None);
    }

    #[test]
    fn safe_subdirectories_cover_cache_tmp_log() {
        for name in ["Cache", "Caches", "tmp", "Logs", "GPUCache", "Code Cache"] {
            assert!(is_safe_subdirectory(name), "{} 应为安全子目录", name);
        }
        assert!(!is_safe_subdirectory("Data"));
        assert!(!is_safe_subdirectory("cachex"));
    }
}
