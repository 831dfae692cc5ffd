use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::modules::scanner::models::ResidualFile;

/// 粉碎请求：路径 + 删除前记录的大小
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShredRequest {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ShredRequest {
    pub fn new(path: PathBuf, size_bytes: u64) -> Self {
        Self { path, size_bytes }
    }
}

impl From<&ResidualFile> for ShredRequest {
    fn from(residual: &ResidualFile) -> Self {
        Self::new(residual.path.clone(), residual.size_bytes)
    }
}

/// 单项状态：Pending -> Shredding -> Done | Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShredStatus {
    Pending,
    Shredding,
    Done,
    Failed,
}

impl ShredStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ShredStatus::Done | ShredStatus::Failed)
    }
}

/// 单项结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShredResult {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub status: ShredStatus,
    pub error: Option<String>,
    pub bytes_reclaimed: u64,
}

impl ShredResult {
    pub fn pending(request: &ShredRequest) -> Self {
        Self {
            path: request.path.clone(),
            size_bytes: request.size_bytes,
            status: ShredStatus::Pending,
            error: None,
            bytes_reclaimed: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ShredStatus::Done
    }
}

/// 进度快照，供界面实时显示
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShredProgress {
    pub current_item: Option<String>,
    pub completed: usize,
    pub total: usize,
    pub bytes_reclaimed: u64,
}

/// 一批粉碎的汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShredSummary {
    pub results: Vec<ShredResult>,
    pub bytes_reclaimed: u64,
    pub cancelled: bool,
}

impl ShredSummary {
    pub fn succeeded(&self) -> usize {
        self.count(ShredStatus::Done)
    }

    pub fn failed(&self) -> usize {
        self.count(ShredStatus::Failed)
    }

    pub fn pending(&self) -> usize {
        self.count(ShredStatus::Pending)
    }

    fn count(&self, status: ShredStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

/// 被安全检查拒绝的项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeniedItem {
    pub path: PathBuf,
    pub reason: String,
}

/// 带安全检查的清理结果
///
/// 失败（results 中的 Failed）与受保护（denied）分开记录。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanSummary {
    pub results: Vec<ShredResult>,
    pub denied: Vec<DeniedItem>,
    pub bytes_reclaimed: u64,
    pub cancelled: bool,
}
