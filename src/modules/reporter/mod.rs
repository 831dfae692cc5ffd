pub mod models;

use std::path::Path;

use crate::modules::common::error::ResidueError;
use models::ShredReport;

/// 以 JSON 写出报告
pub fn write_json_report(report: &ShredReport, path: &Path) -> Result<(), ResidueError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ResidueError::from_io(&parent.display().to_string(), e))?;
        }
    }

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|e| ResidueError::from_io(&path.display().to_string(), e))?;

    tracing::info!("报告已写入: {}", path.display());
    Ok(())
}

pub fn read_json_report(path: &Path) -> Result<ShredReport, ResidueError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ResidueError::from_io(&path.display().to_string(), e))?;
    Ok(serde_json::from_str(&content)?)
}
