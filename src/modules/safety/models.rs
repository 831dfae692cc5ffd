use serde::{Deserialize, Serialize};

/// 删除风险等级，仅用于提示，不阻止删除
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionRiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for DeletionRiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeletionRiskLevel::Low => write!(f, "低"),
            DeletionRiskLevel::Medium => write!(f, "中"),
            DeletionRiskLevel::High => write!(f, "高"),
            DeletionRiskLevel::Critical => write!(f, "严重"),
        }
    }
}

/// 删除建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionAdvice {
    pub risk: DeletionRiskLevel,
    pub message: String,
}

/// 安全检查结论及原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SafetyVerdict {
    /// 可以删除
    Allowed,
    /// 可以删除，但属于关键应用的配置
    AllowedCriticalApp { pattern: String },
    /// 位于受保护路径
    Protected,
    /// 带有系统/用户不可变标志
    Immutable,
    /// 系统偏好设置文件
    SystemPreference,
    /// 所属应用仍已安装或正在运行
    InUse { owner: String },
    /// 无法确认安全（读取失败、非绝对路径等）
    Unverifiable { reason: String },
}

impl SafetyVerdict {
    pub fn is_deletable(&self) -> bool {
        matches!(
            self,
            SafetyVerdict::Allowed | SafetyVerdict::AllowedCriticalApp { .. }
        )
    }

    /// 拒绝原因描述，允许删除时为 None
    pub fn denial_reason(&self) -> Option<String> {
        match self {
            SafetyVerdict::Allowed | SafetyVerdict::AllowedCriticalApp { .. } => None,
            SafetyVerdict::Protected => Some("位于系统或用户关键数据目录".to_string()),
            SafetyVerdict::Immutable => Some("文件带有不可变标志".to_string()),
            SafetyVerdict::SystemPreference => Some("系统偏好设置文件".to_string()),
            SafetyVerdict::InUse { owner } => Some(format!("所属应用仍在使用: {}", owner)),
            SafetyVerdict::Unverifiable { reason } => Some(format!("无法确认安全: {}", reason)),
        }
    }
}
