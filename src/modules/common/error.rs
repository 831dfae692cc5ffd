use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResidueError {
    #[error("文件系统错误: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("受保护路径: {0}")]
    Protected(String),

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("操作已取消: {0}")]
    Cancelled(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("序列化错误: {0}")]
    Serde(String),

    #[error("其他错误: {0}")]
    Other(String),
}

impl ResidueError {
    /// 将 io 错误按类型归类，权限问题单独区分
    pub fn from_io(context: &str, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                ResidueError::PermissionDenied(format!("{}: {}", context, error))
            }
            std::io::ErrorKind::NotFound => ResidueError::NotFound(context.to_string()),
            _ => ResidueError::FileSystem(error),
        }
    }
}

impl From<serde_json::Error> for ResidueError {
    fn from(error: serde_json::Error) -> Self {
        ResidueError::Serde(error.to_string())
    }
}

impl serde::Serialize for ResidueError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
