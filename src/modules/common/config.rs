//! 运行配置
//!
//! 默认值来自当前用户环境，`RUST_YU_HOME` 可覆盖用户主目录（测试和沙盒运行使用）。

use std::path::PathBuf;
use std::time::Duration;

use super::error::ResidueError;

pub const HOME_OVERRIDE_ENV: &str = "RUST_YU_HOME";

/// 已安装应用索引的有效期
pub const DEFAULT_INDEX_TTL: Duration = Duration::from_secs(5 * 60);

/// 粉碎时每次写入的块大小
pub const DEFAULT_SHRED_BLOCK_SIZE: usize = 64 * 1024;

const SYSTEM_APPLICATION_DIRS: &[&str] = &[
    "/Applications",
    "/Applications/Utilities",
    "/System/Applications",
    "/System/Applications/Utilities",
];

const CASK_DIRS: &[&str] = &["/opt/homebrew/Caskroom", "/usr/local/Caskroom"];

#[derive(Debug, Clone)]
pub struct YuConfig {
    pub home_dir: PathBuf,
    pub application_dirs: Vec<PathBuf>,
    pub cask_dirs: Vec<PathBuf>,
    pub index_ttl: Duration,
    pub shred_block_size: usize,
}

impl YuConfig {
    /// 从环境构建配置
    pub fn from_env() -> Result<Self, ResidueError> {
        let home = match std::env::var_os(HOME_OVERRIDE_ENV) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => dirs::home_dir()
                .ok_or_else(|| ResidueError::Config("无法获取用户主目录".to_string()))?,
        };

        Ok(Self::for_home(home))
    }

    /// 以指定主目录构建默认配置
    pub fn for_home(home_dir: PathBuf) -> Self {
        let mut application_dirs: Vec<PathBuf> =
            SYSTEM_APPLICATION_DIRS.iter().map(PathBuf::from).collect();
        application_dirs.push(home_dir.join("Applications"));

        Self {
            home_dir,
            application_dirs,
            cask_dirs: CASK_DIRS.iter().map(PathBuf::from).collect(),
            index_ttl: DEFAULT_INDEX_TTL,
            shred_block_size: DEFAULT_SHRED_BLOCK_SIZE,
        }
    }

    pub fn with_index_ttl(mut self, ttl: Duration) -> Self {
        self.index_ttl = ttl;
        self
    }

    pub fn with_shred_block_size(mut self, block_size: usize) -> Self {
        self.shred_block_size = block_size.max(1);
        self
    }

    /// ~/Library
    pub fn library_dir(&self) -> PathBuf {
        self.home_dir.join("Library")
    }
}
