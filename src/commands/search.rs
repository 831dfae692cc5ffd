use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use super::identity_from_args;
use crate::modules::common::config::YuConfig;
use crate::modules::common::utils;
use crate::modules::safety::models::DeletionAdvice;
use crate::modules::safety::SafetyGuard;
use crate::modules::scanner::{self, models::ResidualFile};

#[derive(Parser, Debug)]
pub struct SearchCommand {
    /// 应用名称
    pub app_name: String,

    /// 应用包标识，如 com.example.app
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// 输出格式 (table/json)
    #[arg(long, default_value = "table")]
    pub format: String,

    /// 输出文件路径
    #[arg(short, long)]
    pub output: Option<String>,
}

/// 残留项及其删除建议
#[derive(Debug, Serialize)]
struct AdvisedResidual {
    #[serde(flatten)]
    residual: ResidualFile,
    deletable: bool,
    advice: DeletionAdvice,
}

pub async fn execute(cmd: SearchCommand, config: &YuConfig) -> Result<()> {
    let identity = identity_from_args(&cmd.app_name, cmd.bundle_id.as_deref());
    println!("正在搜索 \"{}\" 的残留文件...\n", identity.name);

    let residuals = scanner::scan_residual_files(&identity, config).await;

    let guard = SafetyGuard::new(config);
    let advised = tokio::task::spawn_blocking(move || {
        residuals
            .into_iter()
            .map(|residual| AdvisedResidual {
                deletable: guard.is_safe_to_delete(&residual.path),
                advice: guard.get_deletion_advice(&residual.path),
                residual,
            })
            .collect::<Vec<_>>()
    })
    .await?;

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&advised)?),
        _ => print_table(&advised),
    }

    // 保存到文件
    if let Some(output) = &cmd.output {
        let json = serde_json::to_string_pretty(&advised)?;
        std::fs::write(output, json)?;
        println!("\n结果已保存到: {}", output);
    }

    Ok(())
}

fn print_table(advised: &[AdvisedResidual]) {
    println!("找到 {} 个残留:\n", advised.len());

    for item in advised {
        let marker = if item.deletable { " " } else { "!" };
        println!(
            "{} [{:<20}] {} ({}, 风险: {})",
            marker,
            item.residual.category.to_string(),
            item.residual.path.display(),
            utils::format_size(item.residual.size_bytes),
            item.advice.risk
        );
    }

    let total: u64 = advised.iter().map(|a| a.residual.size_bytes).sum();
    let blocked = advised.iter().filter(|a| !a.deletable).count();

    println!("\n--- 统计 ---");
    println!("  合计: {}", utils::format_size(total));
    println!("  不可删除: {}", blocked);
}
