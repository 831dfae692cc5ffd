use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用身份：显示名称 + 包标识
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationIdentity {
    pub name: String,
    pub bundle_identifier: Option<String>,
}

impl ApplicationIdentity {
    pub fn new(name: impl Into<String>, bundle_identifier: Option<String>) -> Self {
        Self {
            name: name.into(),
            bundle_identifier: bundle_identifier
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }
}

/// 残留文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    Preferences,
    ApplicationSupport,
    Caches,
    Containers,
    SavedState,
    Logs,
    GroupContainers,
    Cookies,
    LaunchAgents,
    CrashReports,
    DeveloperData,
}

impl FileCategory {
    pub const ALL: [FileCategory; 11] = [
        FileCategory::Preferences,
        FileCategory::ApplicationSupport,
        FileCategory::Caches,
        FileCategory::Containers,
        FileCategory::SavedState,
        FileCategory::Logs,
        FileCategory::GroupContainers,
        FileCategory::Cookies,
        FileCategory::LaunchAgents,
        FileCategory::CrashReports,
        FileCategory::DeveloperData,
    ];

    /// 相对于 ~/Library 的位置
    pub fn library_subdir(self) -> &'static str {
        match self {
            FileCategory::Preferences => "Preferences",
            FileCategory::ApplicationSupport => "Application Support",
            FileCategory::Caches => "Caches",
            FileCategory::Containers => "Containers",
            FileCategory::SavedState => "Saved Application State",
            FileCategory::Logs => "Logs",
            FileCategory::GroupContainers => "Group Containers",
            FileCategory::Cookies => "Cookies",
            FileCategory::LaunchAgents => "LaunchAgents",
            FileCategory::CrashReports => "Logs/DiagnosticReports",
            FileCategory::DeveloperData => "Developer",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileCategory::Preferences => write!(f, "Preferences"),
            FileCategory::ApplicationSupport => write!(f, "Application Support"),
            FileCategory::Caches => write!(f, "Caches"),
            FileCategory::Containers => write!(f, "Containers"),
            FileCategory::SavedState => write!(f, "Saved State"),
            FileCategory::Logs => write!(f, "Logs"),
            FileCategory::GroupContainers => write!(f, "Group Containers"),
            FileCategory::Cookies => write!(f, "Cookies"),
            FileCategory::LaunchAgents => write!(f, "Launch Agents"),
            FileCategory::CrashReports => write!(f, "Crash Reports"),
            FileCategory::DeveloperData => write!(f, "Developer Data"),
        }
    }
}

/// 残留文件
///
/// 大小在发现时计算，是快照而非实时值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualFile {
    pub path: PathBuf,
    pub category: FileCategory,
    pub size_bytes: u64,
    /// 仅供界面勾选使用
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl ResidualFile {
    pub fn new(path: PathBuf, category: FileCategory, size_bytes: u64) -> Self {
        Self {
            path,
            category,
            size_bytes,
            selected: true,
        }
    }
}
