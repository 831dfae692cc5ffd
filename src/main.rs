use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use rust_yu_mac_lib::commands;
use rust_yu_mac_lib::modules::common::{config::YuConfig, logging};

#[derive(Parser, Debug)]
#[command(name = "rust-yu-mac")]
#[command(about = "macOS 应用残留清理命令行工具", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 用户主目录 (默认为当前用户)
    #[arg(long, global = true, env = "RUST_YU_HOME")]
    home: Option<PathBuf>,

    /// 已安装应用索引有效期 (秒)
    #[arg(long, global = true, env = "RUST_YU_INDEX_TTL")]
    index_ttl: Option<u64>,

    /// 粉碎写入块大小 (字节)
    #[arg(long, global = true, env = "RUST_YU_BLOCK_SIZE")]
    block_size: Option<usize>,
}

impl Cli {
    fn config(&self) -> Result<YuConfig> {
        let mut config = match &self.home {
            Some(home) => YuConfig::for_home(home.clone()),
            None => YuConfig::from_env()?,
        };

        if let Some(secs) = self.index_ttl {
            config = config.with_index_ttl(Duration::from_secs(secs));
        }
        if let Some(block_size) = self.block_size {
            config = config.with_shred_block_size(block_size);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 初始化日志
    logging::init_logging(cli.verbose);

    let result = match cli.config() {
        Ok(config) => {
            tracing::debug!("配置: {:?}", config);

            // 执行命令
            match cli.command {
                commands::Command::List(cmd) => commands::list::execute(cmd, &config).await,
                commands::Command::Search(cmd) => commands::search::execute(cmd, &config).await,
                commands::Command::Check(cmd) => commands::check::execute(cmd, &config).await,
                commands::Command::Clean(cmd) => commands::clean::execute(cmd, &config).await,
                commands::Command::Shred(cmd) => commands::shred::execute(cmd, &config).await,
            }
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => {}
        Err(e) => {
            if cli.verbose {
                tracing::error!("错误: {}", e);
            } else {
                eprintln!("错误: {}", e);
            }
            process::exit(1);
        }
    }

    Ok(())
}
