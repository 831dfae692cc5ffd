use std::path::PathBuf;

use super::models::{InstallSource, InstalledApp};

/// 列出 Homebrew Caskroom 中的 cask
pub fn list_casks(cask_dirs: &[PathBuf]) -> Vec<InstalledApp> {
    let mut casks = Vec::new();

    for dir in cask_dirs {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("跳过 Caskroom {}: {}", dir.display(), e);
                continue;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            casks.push(InstalledApp::new(name, InstallSource::Cask).with_path(entry.path()));
        }
    }

    casks
}
