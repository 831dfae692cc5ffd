pub mod bundles;
pub mod casks;
pub mod models;
pub mod processes;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::modules::common::config::YuConfig;
use crate::modules::common::utils;
use models::InstalledApp;

/// 应用清单来源
///
/// 索引构建和运行状态检查都通过它取数据，测试中可替换为固定清单。
pub trait AppInventory: Send + Sync {
    /// 已安装的应用（应用包 + cask）
    fn installed_apps(&self) -> Vec<InstalledApp>;

    /// 正在运行的应用
    fn running_apps(&self) -> Vec<InstalledApp>;
}

/// 读取本机真实状态的清单
#[derive(Debug, Clone)]
pub struct SystemInventory {
    application_dirs: Vec<PathBuf>,
    cask_dirs: Vec<PathBuf>,
}

impl SystemInventory {
    pub fn new(config: &YuConfig) -> Self {
        Self {
            application_dirs: config.application_dirs.clone(),
            cask_dirs: config.cask_dirs.clone(),
        }
    }
}

impl AppInventory for SystemInventory {
    fn installed_apps(&self) -> Vec<InstalledApp> {
        let mut apps = bundles::list_bundle_apps(&self.application_dirs);
        apps.extend(casks::list_casks(&self.cask_dirs));
        apps
    }

    fn running_apps(&self) -> Vec<InstalledApp> {
        processes::list_running_apps()
    }
}

/// 列出所有已安装应用
pub fn list_all_apps(inventory: &dyn AppInventory, search: Option<&str>) -> Vec<InstalledApp> {
    let mut apps = inventory.installed_apps();
    dedupe_and_sort(&mut apps);
    apply_search_filter(&mut apps, search);
    apps
}

fn apply_search_filter(apps: &mut Vec<InstalledApp>, search: Option<&str>) {
    if let Some(query) = search {
        let normalized_query = query.to_lowercase();
        apps.retain(|app| {
            utils::fuzzy_match(&app.name.to_lowercase(), &normalized_query)
                || app
                    .bundle_identifier
                    .as_ref()
                    .map(|id| utils::fuzzy_match(&id.to_lowercase(), &normalized_query))
                    .unwrap_or(false)
        });
    }
}

fn dedupe_and_sort(apps: &mut Vec<InstalledApp>) {
    let mut seen = HashSet::new();
    apps.retain(|app| {
        let key = app
            .bundle_identifier
            .as_deref()
            .unwrap_or(&app.name)
            .to_lowercase();
        seen.insert(key)
    });
    apps.sort_by(|left, right| left.name.to_lowercase().cmp(&right.name.to_lowercase()));
}
