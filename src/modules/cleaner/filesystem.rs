//! 粉碎用到的底层文件操作

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

use crate::modules::common::error::ResidueError;
use crate::modules::common::utils;

/// 从头到尾写零，每写完一块让出一次调度
///
/// 已发出的块会写完；取消后不再开始新的块。单遍写零，不是加密擦除。
pub async fn overwrite_with_zeros(
    path: &Path,
    block_size: usize,
    cancelled: &AtomicBool,
) -> Result<u64, ResidueError> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .await
        .map_err(|e| ResidueError::from_io(&path.display().to_string(), e))?;

    let len = file.metadata().await?.len();
    let block_size = block_size.max(1);
    let zeros = vec![0u8; block_size];
    let mut written = 0u64;

    while written < len {
        if cancelled.load(Ordering::SeqCst) {
            return Err(ResidueError::Cancelled(path.display().to_string()));
        }

        // 最后一块只写剩余的字节
        let chunk = (len - written).min(block_size as u64) as usize;
        file.write_all(&zeros[..chunk]).await?;
        written += chunk as u64;

        tokio::task::yield_now().await;
    }

    file.flush().await?;
    file.sync_all().await?;

    Ok(written)
}

/// 在同一目录内改成随机名称，返回新路径
pub async fn rename_to_opaque(path: &Path) -> Result<PathBuf, ResidueError> {
    let parent = path
        .parent()
        .ok_or_else(|| ResidueError::Other(format!("没有上级目录: {}", path.display())))?;

    let target = parent.join(utils::opaque_file_name());
    tokio::fs::rename(path, &target)
        .await
        .map_err(|e| ResidueError::from_io(&path.display().to_string(), e))?;

    Ok(target)
}

/// 目录下所有普通文件（不跟随符号链接）
pub fn regular_files_under(dir: &Path) -> Result<Vec<PathBuf>, ResidueError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        // 无法遍历的子目录必须报错，否则其中的文件会跳过覆写
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            match e.into_io_error() {
                Some(io) => ResidueError::from_io(&message, io),
                None => ResidueError::Other(message),
            }
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
