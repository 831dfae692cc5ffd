use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const APP_DIR_NAME: &str = "rust-yu-mac";

pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // 创建日志目录
    let log_dir = get_log_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    // 设置文件输出
    let file_appender = tracing_appender::rolling::daily(&log_dir, "rust-yu-mac.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // 保持 guard 存活
    std::mem::forget(guard);

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "rust_yu_mac={},rust_yu_mac_lib={},info",
            level, level
        )))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let _ = subscriber.try_init();
}

/// 日志目录: macOS 放在 ~/Library/Logs 下，其他平台使用本地数据目录
pub fn get_log_dir() -> std::path::PathBuf {
    if cfg!(target_os = "macos") {
        if let Some(home) = dirs::home_dir() {
            return home.join("Library").join("Logs").join(APP_DIR_NAME);
        }
    }

    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("logs")
}
