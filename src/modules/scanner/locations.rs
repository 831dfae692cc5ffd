//! 各个 ~/Library 位置的残留扫描
//!
//! 任一位置不存在或无权限时只记录日志，不影响其他位置。

use std::path::{Path, PathBuf};

use super::matcher::IdentityMatcher;
use super::models::{FileCategory, ResidualFile};
use crate::modules::common::utils;

const XCODE_BUNDLE_IDENTIFIER: &str = "com.apple.dt.xcode";

/// Xcode 的大块辅助数据，单独列出便于用户取舍
const XCODE_DEVELOPER_SUBPATHS: &[&str] = &[
    "Xcode/DerivedData",
    "Xcode/Archives",
    "Xcode/iOS DeviceSupport",
    "Xcode/watchOS DeviceSupport",
    "Xcode/UserData",
    "CoreSimulator",
    "XCPGDevices",
];

/// 扫描一个类别对应的位置
pub fn scan_category(
    category: FileCategory,
    library: &Path,
    matcher: &IdentityMatcher,
) -> Vec<ResidualFile> {
    let dir = library.join(category.library_subdir());

    let results = match category {
        FileCategory::Preferences => {
            let mut found = scan_matching_entries(&dir, category, |n| matcher.matches(n));
            found.extend(scan_matching_entries(&dir.join("ByHost"), category, |n| {
                matcher.matches(n)
            }));
            found
        }
        FileCategory::SavedState => match matcher.identifier() {
            Some(id) => scan_exact(&dir, &format!("{}.savedState", id), category),
            None => Vec::new(),
        },
        FileCategory::Containers => match matcher.identifier() {
            Some(id) => scan_exact(&dir, id, category),
            None => Vec::new(),
        },
        FileCategory::GroupContainers => match matcher.bundle_identifier() {
            // 组容器名以标识结尾（TEAMID.com.example.app），只做子串匹配
            Some(id) => scan_matching_entries(&dir, category, |n| {
                n.to_lowercase().contains(id)
            }),
            None => Vec::new(),
        },
        FileCategory::Cookies => {
            let mut found = match matcher.identifier() {
                Some(id) => scan_exact(&dir, &format!("{}.binarycookies", id), category),
                None => Vec::new(),
            };
            found.extend(scan_matching_entries(&dir, category, |n| matcher.matches(n)));
            found
        }
        FileCategory::CrashReports => {
            scan_matching_entries(&dir, category, |n| matcher.matches_name(n))
        }
        FileCategory::DeveloperData => scan_developer(&dir, matcher),
        FileCategory::ApplicationSupport
        | FileCategory::Caches
        | FileCategory::Logs
        | FileCategory::LaunchAgents => {
            scan_matching_entries(&dir, category, |n| matcher.matches(n))
        }
    };

    tracing::debug!(
        "扫描 {} ({}): {} 项",
        category,
        dir.display(),
        results.len()
    );

    results
}

/// 列出目录下一层条目，名称命中的记为残留
fn scan_matching_entries<F>(dir: &Path, category: FileCategory, is_match: F) -> Vec<ResidualFile>
where
    F: Fn(&str) -> bool,
{
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("跳过 {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut results = Vec::new();

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();

        // 自身的 ByHost/DiagnosticReports 子目录由对应类别处理
        if is_nested_location(category, &name) {
            continue;
        }

        if is_match(&name) {
            results.push(residual_for(entry.path(), category));
        }
    }

    results
}

/// 直接以标识命名的位置只检查是否存在
fn scan_exact(dir: &Path, name: &str, category: FileCategory) -> Vec<ResidualFile> {
    let path = dir.join(name);

    match std::fs::symlink_metadata(&path) {
        Ok(_) => vec![residual_for(path, category)],
        Err(_) => Vec::new(),
    }
}

fn scan_developer(dir: &Path, matcher: &IdentityMatcher) -> Vec<ResidualFile> {
    let category = FileCategory::DeveloperData;

    let is_xcode = matcher
        .bundle_identifier()
        .map(|id| id.eq_ignore_ascii_case(XCODE_BUNDLE_IDENTIFIER))
        .unwrap_or(false);

    if !is_xcode {
        return scan_matching_entries(dir, category, |n| matcher.matches(n));
    }

    XCODE_DEVELOPER_SUBPATHS
        .iter()
        .map(|sub| dir.join(sub))
        .filter(|path| path.exists())
        .map(|path| residual_for(path, category))
        .collect()
}

fn is_nested_location(category: FileCategory, name: &str) -> bool {
    match category {
        FileCategory::Preferences => name == "ByHost",
        FileCategory::Logs => name == "DiagnosticReports",
        _ => false,
    }
}

fn residual_for(path: PathBuf, category: FileCategory) -> ResidualFile {
    let size = utils::entry_size(&path);
    ResidualFile::new(path, category, size)
}
