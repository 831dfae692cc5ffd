use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallSource {
    /// 应用目录中的 .app 包
    Bundle,
    /// Homebrew cask
    Cask,
    /// 正在运行的进程
    Running,
    /// 未知来源
    #[default]
    Unknown,
}

impl std::fmt::Display for InstallSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallSource::Bundle => write!(f, "Bundle"),
            InstallSource::Cask => write!(f, "Cask"),
            InstallSource::Running => write!(f, "Running"),
            InstallSource::Unknown => write!(f, "Unknown"),
        }
    }
}

/// 已安装（或正在运行）的应用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub name: String,
    pub bundle_identifier: Option<String>,
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub source: InstallSource,
}

impl InstalledApp {
    pub fn new(name: impl Into<String>, source: InstallSource) -> Self {
        Self {
            name: name.into(),
            bundle_identifier: None,
            path: None,
            source,
        }
    }

    pub fn with_bundle_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.bundle_identifier = Some(identifier.into());
        self
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}
