pub mod filesystem;
pub mod models;
pub mod safety;
pub mod shredder;

use crate::modules::common::error::ResidueError;
use crate::modules::safety::SafetyGuard;
use models::{CleanSummary, DeniedItem, ShredRequest};
use shredder::Shredder;

/// 清理残留文件
///
/// 每一项先过安全检查，被拒绝的记入 `denied`，其余交给粉碎引擎顺序处理。
pub async fn clean_residuals(
    requests: Vec<ShredRequest>,
    confirm: bool,
    guard: &SafetyGuard,
    shredder: &Shredder,
) -> Result<CleanSummary, ResidueError> {
    if !confirm {
        return Err(ResidueError::PermissionDenied(
            "需要确认才能执行清理".to_string(),
        ));
    }

    let mut approved = Vec::with_capacity(requests.len());
    let mut denied = Vec::new();

    for request in requests {
        // 安全检查
        if let Err(e) = safety::pre_delete_check(guard, &request.path) {
            tracing::warn!("跳过受保护项: {}", e);
            denied.push(DeniedItem {
                path: request.path.clone(),
                reason: e.to_string(),
            });
            continue;
        }

        approved.push(request);
    }

    tracing::info!(
        "开始清理: {} 项通过检查, {} 项被拒绝",
        approved.len(),
        denied.len()
    );

    let summary = shredder.shred(approved).await;

    Ok(CleanSummary {
        bytes_reclaimed: summary.bytes_reclaimed,
        cancelled: summary.cancelled,
        results: summary.results,
        denied,
    })
}
