use anyhow::Result;
use clap::Parser;

use super::resolve_cli_path;
use crate::modules::cleaner::{self, models::ShredRequest, shredder::Shredder};
use crate::modules::common::config::YuConfig;
use crate::modules::common::utils;
use crate::modules::safety::SafetyGuard;

#[derive(Parser, Debug)]
pub struct ShredCommand {
    /// 要粉碎的路径 (可多个)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// 确认删除
    #[arg(long)]
    pub confirm: bool,
}

pub async fn execute(cmd: ShredCommand, config: &YuConfig) -> Result<()> {
    let requests: Vec<ShredRequest> = cmd
        .paths
        .iter()
        .map(|raw| {
            let path = resolve_cli_path(raw, &config.home_dir);
            let size = utils::entry_size(&path);
            ShredRequest::new(path, size)
        })
        .collect();

    if !cmd.confirm {
        println!("将粉碎以下 {} 项 (使用 --confirm 确认):", requests.len());
        for request in &requests {
            println!(
                "  {} ({})",
                request.path.display(),
                utils::format_size(request.size_bytes)
            );
        }
        return Ok(());
    }

    let guard = SafetyGuard::new(config);
    let shredder = Shredder::from_config(config);

    let handle = shredder.handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let summary = cleaner::clean_residuals(requests, cmd.confirm, &guard, &shredder).await?;
    ctrl_c.abort();

    for result in &summary.results {
        match &result.error {
            Some(error) => println!("  失败 {}: {}", result.path.display(), error),
            None => println!("  {:?} {}", result.status, result.path.display()),
        }
    }
    for item in &summary.denied {
        println!("  拒绝 {}: {}", item.path.display(), item.reason);
    }

    println!("\n释放空间: {}", utils::format_size(summary.bytes_reclaimed));

    Ok(())
}
