// 错误类型
//
// 每个错误都在触发它的那次操作边界上被处理，不会让进程异常退出。

use std::path::PathBuf;

use thiserror::Error;

/// 输入校验失败：阻断操作，不写文件，不改状态
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("请输入企业/医院名称！")]
    MissingCompany,

    #[error("请输入追溯码！")]
    MissingCodes,

    #[error("没有有效的追溯码！")]
    NoValidCodes,
}

/// 表格导出失败
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("无法创建输出目录 {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("企业名称包含文件名不允许的字符: {0}")]
    InvalidFileName(String),

    #[error("写入文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("生成表格失败: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// "打开文件夹" 失败
#[derive(Debug, Error)]
pub enum OpenFolderError {
    #[error("不支持的操作系统: {0}")]
    UnsupportedPlatform(String),

    #[error("无法创建文件夹 {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("启动文件管理器失败: {0}")]
    Launch(#[from] std::io::Error),
}

/// "生成表格" 操作的错误
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl GenerateError {
    /// 校验类错误只需提示警告，其余为真正的错误
    pub fn is_validation(&self) -> bool {
        matches!(self, GenerateError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::MissingCompany.to_string(), "请输入企业/医院名称！");
        assert_eq!(ValidationError::MissingCodes.to_string(), "请输入追溯码！");
        assert_eq!(ValidationError::NoValidCodes.to_string(), "没有有效的追溯码！");
    }

    #[test]
    fn test_generate_error_is_transparent() {
        let err = GenerateError::from(ValidationError::MissingCodes);
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "请输入追溯码！");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = GenerateError::from(ExportError::from(io));
        assert!(!err.is_validation());
        assert!(err.to_string().contains("denied"));
    }
}
