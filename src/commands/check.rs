use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use super::resolve_cli_path;
use crate::modules::common::config::YuConfig;
use crate::modules::safety::SafetyGuard;

#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// 要检查的路径
    #[arg(required_unless_present = "installed")]
    pub path: Option<String>,

    /// 检查应用名称或标识是否仍已安装
    #[arg(long, conflicts_with = "path")]
    pub installed: Option<String>,
}

pub async fn execute(cmd: CheckCommand, config: &YuConfig) -> Result<()> {
    let guard = SafetyGuard::new(config);

    if let Some(identifier) = cmd.installed {
        let installed = tokio::task::spawn_blocking({
            let identifier = identifier.clone();
            move || guard.is_application_installed(&identifier)
        })
        .await?;

        println!(
            "{}: {}",
            identifier,
            if installed { "已安装或正在运行" } else { "未安装" }
        );
        return Ok(());
    }

    let Some(raw) = cmd.path else {
        anyhow::bail!("需要指定路径或 --installed");
    };
    let path: PathBuf = resolve_cli_path(&raw, &config.home_dir);

    let (verdict, advice, orphaned) = tokio::task::spawn_blocking({
        let path = path.clone();
        move || {
            let verdict = guard.safety_verdict(&path);
            let advice = guard.get_deletion_advice(&path);
            let orphaned = is_preference_file(&path).then(|| guard.is_preference_orphaned(&path));
            (verdict, advice, orphaned)
        }
    })
    .await?;

    println!("路径: {}", path.display());
    println!("可删除: {}", if verdict.is_deletable() { "是" } else { "否" });
    if let Some(reason) = verdict.denial_reason() {
        println!("原因: {}", reason);
    }
    println!("风险: {} - {}", advice.risk, advice.message);

    if let Some(orphaned) = orphaned {
        println!("孤立偏好设置: {}", if orphaned { "是" } else { "否" });
    }

    Ok(())
}

fn is_preference_file(path: &std::path::Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("plist"))
        .unwrap_or(false)
}
