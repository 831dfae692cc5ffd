//! 应用目录扫描与 Info.plist 解析

use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;
use walkdir::WalkDir;

use super::models::{InstallSource, InstalledApp};

/// 应用目录下 .app 的最大搜索深度（兼容 /Applications/Suite/Foo.app）
const MAX_BUNDLE_DEPTH: usize = 2;

const BINARY_PLIST_MAGIC: &[u8] = b"bplist00";

/// Info.plist 中读取到的信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleInfo {
    pub identifier: Option<String>,
    pub display_name: Option<String>,
}

/// 扫描应用目录，列出全部 .app 包
pub fn list_bundle_apps(app_dirs: &[PathBuf]) -> Vec<InstalledApp> {
    let mut apps = Vec::new();

    for dir in app_dirs {
        if !dir.is_dir() {
            continue;
        }

        tracing::debug!("扫描应用目录: {}", dir.display());

        let mut walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(MAX_BUNDLE_DEPTH)
            .follow_links(false)
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };

            if !is_app_bundle(entry.path()) {
                continue;
            }

            // 不进入 .app 内部
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }

            apps.push(app_from_bundle(entry.path()));
        }
    }

    apps
}

/// 由 .app 路径构建应用信息，无法解析 plist 时仅保留名称
pub fn app_from_bundle(bundle: &Path) -> InstalledApp {
    let stem = bundle
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let info = read_bundle_info(bundle).unwrap_or_default();
    let name = info.display_name.unwrap_or(stem);

    let mut app = InstalledApp::new(name, InstallSource::Bundle).with_path(bundle.to_path_buf());
    if let Some(identifier) = info.identifier {
        app = app.with_bundle_identifier(identifier);
    }
    app
}

/// 读取 `Contents/Info.plist`
pub fn read_bundle_info(bundle: &Path) -> Option<BundleInfo> {
    let plist_path = bundle.join("Contents").join("Info.plist");
    let bytes = std::fs::read(&plist_path).ok()?;

    let xml = if bytes.starts_with(BINARY_PLIST_MAGIC) {
        convert_binary_plist(&plist_path)?
    } else {
        String::from_utf8_lossy(&bytes).to_string()
    };

    Some(parse_info_plist(&xml))
}

/// 从 XML plist 中提取包标识和显示名称
pub fn parse_info_plist(xml: &str) -> BundleInfo {
    let identifier = plist_string_value(xml, "CFBundleIdentifier");
    let display_name = plist_string_value(xml, "CFBundleDisplayName")
        .or_else(|| plist_string_value(xml, "CFBundleName"));

    BundleInfo {
        identifier,
        display_name,
    }
}

fn plist_string_value(xml: &str, key: &str) -> Option<String> {
    let pattern = format!(
        r"<key>\s*{}\s*</key>\s*<string>([^<]*)</string>",
        regex::escape(key)
    );
    let re = Regex::new(&pattern).ok()?;

    re.captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 二进制 plist 交给 plutil 转换
fn convert_binary_plist(path: &Path) -> Option<String> {
    let output = Command::new("plutil")
        .args(["-convert", "xml1", "-o", "-"])
        .arg(path)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            tracing::debug!(
                "plutil 转换失败 {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr)
            );
            None
        }
        Err(e) => {
            tracing::debug!("无法执行 plutil: {}", e);
            None
        }
    }
}

fn is_app_bundle(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("app"))
        .unwrap_or(false)
}

/// 从可执行文件路径反推所在的 .app 包
pub fn bundle_for_executable(exe: &Path) -> Option<PathBuf> {
    exe.ancestors()
        .find(|ancestor| is_app_bundle(ancestor))
        .map(Path::to_path_buf)
}
