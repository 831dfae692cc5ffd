use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::cleaner::models::{CleanSummary, DeniedItem, ShredResult, ShredStatus};
use crate::modules::scanner::models::ResidualFile;

/// 清理报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShredReport {
    pub id: String,
    pub application: String,
    pub generated_at: DateTime<Utc>,
    pub residuals_found: Vec<ResidualFile>,
    pub results: Vec<ShredResult>,
    pub denied: Vec<DeniedItem>,
    pub total_bytes_reclaimed: u64,
    pub success: bool,
}

impl ShredReport {
    pub fn new(application: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            application,
            generated_at: Utc::now(),
            residuals_found: Vec::new(),
            results: Vec::new(),
            denied: Vec::new(),
            total_bytes_reclaimed: 0,
            success: true,
        }
    }

    pub fn with_residuals(mut self, residuals: Vec<ResidualFile>) -> Self {
        self.residuals_found = residuals;
        self
    }

    /// 有失败项或被取消时 success 为 false；被拒绝的项不算失败
    pub fn with_summary(mut self, summary: CleanSummary) -> Self {
        self.total_bytes_reclaimed = summary.bytes_reclaimed;
        self.success = !summary.cancelled
            && summary
                .results
                .iter()
                .all(|r| r.status == ShredStatus::Done);
        self.results = summary.results;
        self.denied = summary.denied;
        self
    }
}
