pub mod locations;
pub mod matcher;
pub mod models;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::modules::common::config::YuConfig;
use matcher::IdentityMatcher;
use models::{ApplicationIdentity, FileCategory, ResidualFile};

/// 扫描应用的全部残留文件
///
/// 每个位置独立扫描，互不影响；结果去重后按类别、路径排序。
pub async fn scan_residual_files(
    identity: &ApplicationIdentity,
    config: &YuConfig,
) -> Vec<ResidualFile> {
    scan_categories(identity, config, &FileCategory::ALL).await
}

/// 只扫描指定类别
pub async fn scan_categories(
    identity: &ApplicationIdentity,
    config: &YuConfig,
    categories: &[FileCategory],
) -> Vec<ResidualFile> {
    let library = config.library_dir();
    let matcher = IdentityMatcher::new(identity);

    tracing::info!(
        "开始扫描残留: {} ({})",
        identity.name,
        identity.bundle_identifier.as_deref().unwrap_or("-")
    );

    // 并行扫描不同位置
    let mut handles = Vec::new();
    for &category in categories {
        let library = library.clone();
        let matcher = matcher.clone();
        handles.push((
            category,
            tokio::task::spawn_blocking(move || {
                locations::scan_category(category, &library, &matcher)
            }),
        ));
    }

    // 等待所有任务完成
    let mut all = Vec::new();
    for (category, handle) in handles {
        match handle.await {
            Ok(mut found) => all.append(&mut found),
            Err(e) => tracing::warn!("{} 扫描失败: {}", category, e),
        }
    }

    let result = finalize(all);
    tracing::info!("扫描完成: 找到 {} 个残留", result.len());
    result
}

/// 按路径去重，再按类别、路径排序
fn finalize(mut residuals: Vec<ResidualFile>) -> Vec<ResidualFile> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    residuals.retain(|r| seen.insert(r.path.clone()));
    residuals.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.path.cmp(&b.path)));
    residuals
}

/// 合计大小
pub fn total_size(residuals: &[ResidualFile]) -> u64 {
    residuals.iter().map(|r| r.size_bytes).sum()
}
