use std::collections::HashMap;
use std::path::PathBuf;

use sysinfo::{ProcessesToUpdate, System};

use super::bundles;
use super::models::{InstallSource, InstalledApp};

/// 列出当前运行的进程
///
/// 可执行文件位于某个 .app 包内时，补充该包的标识。
pub fn list_running_apps() -> Vec<InstalledApp> {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let mut bundle_cache: HashMap<PathBuf, Option<String>> = HashMap::new();
    let mut apps = Vec::new();

    for process in sys.processes().values() {
        let name = process.name().to_string_lossy().to_string();
        if name.is_empty() {
            continue;
        }

        let mut app = InstalledApp::new(name, InstallSource::Running);

        if let Some(bundle) = process.exe().and_then(bundles::bundle_for_executable) {
            let identifier = bundle_cache
                .entry(bundle.clone())
                .or_insert_with(|| {
                    bundles::read_bundle_info(&bundle).and_then(|info| info.identifier)
                })
                .clone();

            if let Some(identifier) = identifier {
                app = app.with_bundle_identifier(identifier);
            }
            app = app.with_path(bundle);
        }

        apps.push(app);
    }

    apps
}
