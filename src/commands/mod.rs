pub mod check;
pub mod clean;
pub mod list;
pub mod search;
pub mod shred;

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::modules::common::utils;
use crate::modules::scanner::models::ApplicationIdentity;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 列出已安装的应用
    List(list::ListCommand),

    /// 搜索应用的残留文件
    Search(search::SearchCommand),

    /// 检查路径能否安全删除
    Check(check::CheckCommand),

    /// 清理应用的残留文件
    Clean(clean::CleanCommand),

    /// 安全粉碎指定路径
    Shred(shred::ShredCommand),
}

pub(crate) fn identity_from_args(name: &str, bundle_id: Option<&str>) -> ApplicationIdentity {
    ApplicationIdentity::new(name, bundle_id.map(str::to_string))
}

/// 展开 `~`，相对路径按当前目录补全
pub(crate) fn resolve_cli_path(raw: &str, home: &Path) -> PathBuf {
    let expanded = utils::expand_tilde(raw, home);
    if expanded.is_absolute() {
        return expanded;
    }

    match std::env::current_dir() {
        // 重新收集组件以去掉中间的 `.`
        Ok(cwd) => cwd.join(&expanded).components().collect(),
        Err(e) => {
            tracing::warn!("无法获取当前目录，保留相对路径 {}: {}", raw, e);
            expanded
        }
    }
}

pub(crate) fn truncate_string(s: &str, max_len: usize) -> String {
    // 按 char 截断，避免切到多字节字符中间
    if s.chars().count() > max_len {
        let chars: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", chars)
    } else {
        s.to_string()
    }
}
