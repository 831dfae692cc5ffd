//! 名称/标识匹配规则

use super::models::ApplicationIdentity;

/// 标识分段长度超过该值才参与部分匹配
pub const MIN_IDENTIFIER_COMPONENT_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct IdentityMatcher {
    name: Option<String>,
    compact_name: Option<String>,
    identifier: Option<String>,
    bundle_identifier: Option<String>,
    components: Vec<String>,
}

impl IdentityMatcher {
    pub fn new(identity: &ApplicationIdentity) -> Self {
        let name = Some(identity.name.trim().to_lowercase()).filter(|n| !n.is_empty());

        // "Visual Studio Code" -> "visualstudiocode"
        let compact_name = name
            .as_ref()
            .map(|n| n.split_whitespace().collect::<String>())
            .filter(|compact| Some(compact) != name.as_ref() && !compact.is_empty());

        let bundle_identifier = identity
            .bundle_identifier
            .as_ref()
            .map(|id| id.to_lowercase());

        let components = bundle_identifier
            .as_ref()
            .map(|id| {
                id.split('.')
                    .filter(|c| c.len() > MIN_IDENTIFIER_COMPONENT_LEN)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name,
            compact_name,
            identifier: identity.bundle_identifier.clone(),
            bundle_identifier,
            components,
        }
    }

    /// 小写的包标识
    pub fn bundle_identifier(&self) -> Option<&str> {
        self.bundle_identifier.as_deref()
    }

    /// 保留原始大小写的包标识，用于按标识直接拼出路径
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// 名称、标识或标识分段任一命中
    pub fn matches(&self, entry_name: &str) -> bool {
        let lower = entry_name.to_lowercase();

        self.matches_name_lower(&lower)
            || self
                .bundle_identifier
                .as_ref()
                .map(|id| lower.contains(id.as_str()))
                .unwrap_or(false)
            || self
                .components
                .iter()
                .any(|component| lower.contains(component.as_str()))
    }

    /// 只按显示名称匹配（崩溃报告文件名中没有标识）
    pub fn matches_name(&self, entry_name: &str) -> bool {
        self.matches_name_lower(&entry_name.to_lowercase())
    }

    fn matches_name_lower(&self, lower: &str) -> bool {
        let by_name = self
            .name
            .as_ref()
            .map(|name| lower.contains(name.as_str()))
            .unwrap_or(false);

        by_name
            || self
                .compact_name
                .as_ref()
                .map(|compact| lower.contains(compact.as_str()))
                .unwrap_or(false)
    }
}
