//! 安全删除引擎
//!
//! 逐项顺序处理：写零覆盖、改成随机名称、删除。每写完一块让出一次调度，
//! 取消后不再开始新的项，未开始的项保持 Pending。

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use super::filesystem;
use super::models::{ShredProgress, ShredRequest, ShredResult, ShredStatus, ShredSummary};
use crate::modules::common::config::{YuConfig, DEFAULT_SHRED_BLOCK_SIZE};
use crate::modules::common::error::ResidueError;

/// 每个文件覆写完成、删除之前调用
pub type Inspector = Arc<dyn Fn(&Path) + Send + Sync>;

/// 取消句柄，可在其他任务中使用
#[derive(Debug, Clone)]
pub struct ShredHandle {
    cancelled: Arc<AtomicBool>,
}

impl ShredHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct Shredder {
    block_size: usize,
    cancelled: Arc<AtomicBool>,
    progress: watch::Sender<ShredProgress>,
    inspector: Option<Inspector>,
}

impl Default for Shredder {
    fn default() -> Self {
        Self::new(DEFAULT_SHRED_BLOCK_SIZE)
    }
}

impl Shredder {
    pub fn new(block_size: usize) -> Self {
        let (progress, _) = watch::channel(ShredProgress::default());

        Self {
            block_size: block_size.max(1),
            cancelled: Arc::new(AtomicBool::new(false)),
            progress,
            inspector: None,
        }
    }

    pub fn from_config(config: &YuConfig) -> Self {
        Self::new(config.shred_block_size)
    }

    pub fn with_inspector(mut self, inspector: Inspector) -> Self {
        self.inspector = Some(inspector);
        self
    }

    pub fn handle(&self) -> ShredHandle {
        ShredHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// 订阅进度
    pub fn subscribe(&self) -> watch::Receiver<ShredProgress> {
        self.progress.subscribe()
    }

    /// 顺序粉碎一批路径
    ///
    /// 取消是一次性的：同一个 Shredder 取消后再调用也不会处理任何项。
    pub async fn shred(&self, requests: Vec<ShredRequest>) -> ShredSummary {
        let mut results: Vec<ShredResult> = requests.iter().map(ShredResult::pending).collect();
        let total = results.len();
        let mut bytes_reclaimed = 0u64;
        let mut completed = 0usize;

        self.progress.send_replace(ShredProgress {
            current_item: None,
            completed,
            total,
            bytes_reclaimed,
        });

        for result in results.iter_mut() {
            if self.cancelled.load(Ordering::SeqCst) {
                tracing::info!("粉碎已取消，剩余 {} 项未处理", total - completed);
                break;
            }

            result.status = ShredStatus::Shredding;
            self.progress.send_replace(ShredProgress {
                current_item: Some(result.path.display().to_string()),
                completed,
                total,
                bytes_reclaimed,
            });

            match self.shred_path(&result.path).await {
                Ok(()) => {
                    result.status = ShredStatus::Done;
                    result.bytes_reclaimed = result.size_bytes;
                    bytes_reclaimed += result.size_bytes;
                    tracing::info!("已粉碎: {}", result.path.display());
                }
                Err(e) => {
                    result.status = ShredStatus::Failed;
                    result.error = Some(e.to_string());
                    tracing::warn!("粉碎失败 {}: {}", result.path.display(), e);
                }
            }

            completed += 1;
            self.progress.send_replace(ShredProgress {
                current_item: None,
                completed,
                total,
                bytes_reclaimed,
            });
        }

        ShredSummary {
            results,
            bytes_reclaimed,
            cancelled: self.cancelled.load(Ordering::SeqCst),
        }
    }

    async fn shred_path(&self, path: &Path) -> Result<(), ResidueError> {
        let metadata = match tokio::fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // 已经不存在，视为完成
                tracing::debug!("路径已不存在: {}", path.display());
                return Ok(());
            }
            Err(e) => return Err(ResidueError::from_io(&path.display().to_string(), e)),
        };

        let file_type = metadata.file_type();

        if file_type.is_dir() {
            self.shred_dir(path).await?;
        } else if file_type.is_file() {
            self.shred_file(path).await?;
        } else {
            // 符号链接只删链接本身；FIFO、套接字、设备节点不能写入，直接删除目录项
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| ResidueError::from_io(&path.display().to_string(), e))?;
        }

        Ok(())
    }

    async fn shred_file(&self, path: &Path) -> Result<(), ResidueError> {
        filesystem::overwrite_with_zeros(path, self.block_size, &self.cancelled).await?;

        let renamed = filesystem::rename_to_opaque(path).await?;
        self.inspect(&renamed);

        tokio::fs::remove_file(&renamed)
            .await
            .map_err(|e| ResidueError::from_io(&renamed.display().to_string(), e))
    }

    async fn shred_dir(&self, dir: &Path) -> Result<(), ResidueError> {
        let root = dir.to_path_buf();
        let files = tokio::task::spawn_blocking(move || filesystem::regular_files_under(&root))
            .await
            .map_err(|e| ResidueError::Other(format!("遍历目录任务失败: {}", e)))??;

        for file in &files {
            filesystem::overwrite_with_zeros(file, self.block_size, &self.cancelled).await?;
            self.inspect(file);
        }

        tokio::fs::remove_dir_all(dir)
            .await
            .map_err(|e| ResidueError::from_io(&dir.display().to_string(), e))
    }

    fn inspect(&self, path: &Path) {
        if let Some(inspector) = &self.inspector {
            inspector(path);
        }
    }
}
