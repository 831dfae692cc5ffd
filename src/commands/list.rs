use anyhow::Result;
use clap::Parser;

use super::truncate_string;
use crate::modules::common::config::YuConfig;
use crate::modules::lister::{self, models::InstalledApp, SystemInventory};

#[derive(Parser, Debug)]
pub struct ListCommand {
    /// 输出格式 (table/json)
    #[arg(long, default_value = "table")]
    pub format: String,

    /// 搜索关键词
    #[arg(short, long)]
    pub search: Option<String>,
}

pub async fn execute(cmd: ListCommand, config: &YuConfig) -> Result<()> {
    tracing::info!("列出已安装应用, search: {:?}", cmd.search);

    let inventory = SystemInventory::new(config);
    let search = cmd.search.clone();
    let apps = tokio::task::spawn_blocking(move || {
        lister::list_all_apps(&inventory, search.as_deref())
    })
    .await?;

    match cmd.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&apps)?);
        }
        _ => {
            print_table(&apps);
        }
    }

    Ok(())
}

fn print_table(apps: &[InstalledApp]) {
    println!("\n{}", "=".repeat(100));
    println!("{:<35} {:<45} {:<10}", "名称", "标识", "来源");
    println!("{}", "=".repeat(100));

    for app in apps {
        println!(
            "{:<35} {:<45} {:<10}",
            truncate_string(&app.name, 34),
            truncate_string(app.bundle_identifier.as_deref().unwrap_or("-"), 44),
            app.source
        );
    }

    println!("{}", "=".repeat(100));
    println!("总计: {} 个应用\n", apps.len());
}
