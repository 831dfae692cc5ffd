use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 展开路径开头的 `~`
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }

    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// 规范化路径用于比较（小写、去掉末尾斜杠）
pub fn normalize_path(path: &Path) -> String {
    let mut normalized = path.to_string_lossy().to_lowercase();

    // 处理连续的斜杠
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }

    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

/// 文件实际占用的字节数
///
/// 优先使用分配块大小，拿不到时（块数为 0 或非 unix 平台）回退到逻辑长度。
pub fn allocated_size(metadata: &std::fs::Metadata) -> u64 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        let allocated = metadata.blocks().saturating_mul(512);
        if allocated > 0 {
            return allocated;
        }
    }

    metadata.len()
}

/// 计算目录大小
///
/// 符号链接和无权限的条目跳过，记为 0。
pub fn calculate_dir_size(path: &Path) -> u64 {
    let mut size = 0u64;

    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            if let Ok(metadata) = entry.metadata() {
                size += allocated_size(&metadata);
            }
        }
    }

    size
}

/// 计算文件或目录大小，不存在或无法读取时为 0
pub fn entry_size(path: &Path) -> u64 {
    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => calculate_dir_size(path),
        Ok(metadata) if metadata.is_file() => allocated_size(&metadata),
        _ => 0,
    }
}

/// 模糊匹配字符串
pub fn fuzzy_match(text: &str, pattern: &str) -> bool {
    let matcher = SkimMatcherV2::default();
    matcher.fuzzy_match(text, pattern).is_some()
}

/// 格式化文件大小
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 生成不含原始信息的随机文件名
pub fn opaque_file_name() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 文件名（小写）
pub fn file_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
