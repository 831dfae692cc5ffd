use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use super::{identity_from_args, resolve_cli_path};
use crate::modules::cleaner::{self, models::ShredRequest, shredder::Shredder};
use crate::modules::common::config::YuConfig;
use crate::modules::common::utils;
use crate::modules::reporter::{self, models::ShredReport};
use crate::modules::safety::SafetyGuard;
use crate::modules::scanner::{self, models::ResidualFile};

#[derive(Parser, Debug)]
pub struct CleanCommand {
    /// 应用名称
    pub app_name: String,

    /// 应用包标识，如 com.example.app
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// 确认删除 (不指定则预览)
    #[arg(long)]
    pub confirm: bool,

    /// 排除的路径 (可多次指定)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// 预览时同时列出被拒绝的项及原因
    #[arg(long)]
    pub include_protected_advice: bool,

    /// 报告输出路径 (JSON)
    #[arg(long)]
    pub report: Option<String>,
}

pub async fn execute(cmd: CleanCommand, config: &YuConfig) -> Result<()> {
    let identity = identity_from_args(&cmd.app_name, cmd.bundle_id.as_deref());

    // 1. 搜索残留
    println!("正在搜索残留文件...");
    let residuals = scanner::scan_residual_files(&identity, config).await;

    let excluded: Vec<PathBuf> = cmd
        .exclude
        .iter()
        .map(|p| resolve_cli_path(p, &config.home_dir))
        .collect();

    let candidates: Vec<ResidualFile> = residuals
        .iter()
        .filter(|r| r.selected && !excluded.iter().any(|e| r.path.starts_with(e)))
        .cloned()
        .collect();

    // 2. 安全检查
    let guard = Arc::new(SafetyGuard::new(config));
    let (allowed, denied) = tokio::task::spawn_blocking({
        let guard = Arc::clone(&guard);
        move || partition_by_verdict(&guard, candidates)
    })
    .await?;

    println!("找到 {} 个残留, {} 个可清理\n", residuals.len(), allowed.len());

    // 3. 预览模式 (不确认)
    if !cmd.confirm {
        println!("=== 预览模式 ===");
        println!("使用 --confirm 确认删除\n");

        for residual in &allowed {
            println!(
                "  [{:<20}] {} ({})",
                residual.category.to_string(),
                residual.path.display(),
                utils::format_size(residual.size_bytes)
            );
        }

        if cmd.include_protected_advice && !denied.is_empty() {
            println!("\n不会删除:");
            for (residual, reason) in &denied {
                println!("  {} - {}", residual.path.display(), reason);
            }
        }

        println!(
            "\n共 {} 项, {}",
            allowed.len(),
            utils::format_size(scanner::total_size(&allowed))
        );
        return Ok(());
    }

    // 4. 执行删除
    println!("=== 开始清理 ===\n");

    let shredder = Shredder::from_config(config);
    let handle = shredder.handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n收到中断信号，完成当前文件后停止...");
            handle.cancel();
        }
    });

    let mut progress = shredder.subscribe();
    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let snapshot = progress.borrow_and_update().clone();
            if let Some(item) = snapshot.current_item {
                println!("  [{}/{}] {}", snapshot.completed + 1, snapshot.total, item);
            }
        }
    });

    let requests: Vec<ShredRequest> = allowed.iter().map(ShredRequest::from).collect();
    let summary = cleaner::clean_residuals(requests, true, &guard, &shredder).await?;

    ctrl_c.abort();
    drop(shredder);
    let _ = printer.await;

    // 5. 统计结果
    let succeeded = summary.results.iter().filter(|r| r.is_success()).count();
    let failed = summary
        .results
        .iter()
        .filter(|r| r.status == cleaner::models::ShredStatus::Failed)
        .count();
    let pending = summary
        .results
        .iter()
        .filter(|r| !r.status.is_terminal())
        .count();

    println!("\n--- 清理完成 ---");
    println!("  成功: {}", succeeded);
    println!("  失败: {}", failed);
    if summary.cancelled {
        println!("  未处理 (已取消): {}", pending);
    }
    println!("  拒绝: {}", summary.denied.len() + denied.len());
    println!("  释放空间: {}", utils::format_size(summary.bytes_reclaimed));

    for result in summary.results.iter().filter(|r| r.error.is_some()) {
        println!(
            "  失败: {} ({})",
            result.path.display(),
            result.error.as_deref().unwrap_or_default()
        );
    }

    // 6. 生成报告
    if let Some(report_path) = cmd.report {
        let mut summary = summary;
        summary.denied.extend(
            denied
                .into_iter()
                .map(|(residual, reason)| cleaner::models::DeniedItem {
                    path: residual.path,
                    reason,
                }),
        );

        let report = ShredReport::new(identity.name.clone())
            .with_residuals(residuals)
            .with_summary(summary);

        reporter::write_json_report(&report, std::path::Path::new(&report_path))?;
        println!("\n报告已生成: {}", report_path);
    }

    Ok(())
}

/// 分出可删除项和被拒绝项（附原因）
fn partition_by_verdict(
    guard: &SafetyGuard,
    candidates: Vec<ResidualFile>,
) -> (Vec<ResidualFile>, Vec<(ResidualFile, String)>) {
    let mut allowed = Vec::new();
    let mut denied = Vec::new();

    for residual in candidates {
        match guard.safety_verdict(&residual.path).denial_reason() {
            None => allowed.push(residual),
            Some(reason) => {
                tracing::info!("跳过 {}: {}", residual.path.display(), reason);
                denied.push((residual, reason));
            }
        }
    }

    (allowed, denied)
}
