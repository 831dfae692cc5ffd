use std::path::Path;

use crate::modules::common::error::ResidueError;
use crate::modules::safety::SafetyGuard;

/// 删除前检查
///
/// 上游已经过滤过也要再查一次。
pub fn pre_delete_check(guard: &SafetyGuard, path: &Path) -> Result<(), ResidueError> {
    let verdict = guard.safety_verdict(path);

    match verdict.denial_reason() {
        Some(reason) => Err(ResidueError::Protected(format!(
            "{}: {}",
            path.display(),
            reason
        ))),
        None => Ok(()),
    }
}
