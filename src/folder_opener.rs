// 打开文件夹
//
// 不同操作系统使用不同的文件管理器命令。启动时根据宿主系统选定一个实现，
// 之后表单控制器只依赖 `FolderOpener` trait。

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::OpenFolderError;

/// 在系统文件管理器中打开目录
pub trait FolderOpener {
    fn open_folder(&self, path: &Path) -> Result<(), OpenFolderError>;
}

/// 通过外部命令打开目录（`open` / `explorer` / `xdg-open`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOpener {
    program: &'static str,
}

impl CommandOpener {
    pub fn macos() -> Self {
        Self { program: "open" }
    }

    pub fn windows() -> Self {
        Self { program: "explorer" }
    }

    pub fn linux() -> Self {
        Self { program: "xdg-open" }
    }

    pub fn program(&self) -> &'static str {
        self.program
    }
}

impl FolderOpener for CommandOpener {
    fn open_folder(&self, path: &Path) -> Result<(), OpenFolderError> {
        tracing::info!("打开文件夹: {:?} (via {})", path, self.program);
        // explorer 即使成功也会返回非零退出码，这里只关心能否启动
        Command::new(self.program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

/// 未适配的操作系统
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedOpener {
    os: String,
}

impl UnsupportedOpener {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

impl FolderOpener for UnsupportedOpener {
    fn open_folder(&self, path: &Path) -> Result<(), OpenFolderError> {
        tracing::warn!("不支持的操作系统 {}，无法打开 {:?}", self.os, path);
        Err(OpenFolderError::UnsupportedPlatform(self.os.clone()))
    }
}

/// 按操作系统名称选择实现（取值同 `std::env::consts::OS`）
pub fn for_os(os: &str) -> Box<dyn FolderOpener> {
    match os {
        "macos" => Box::new(CommandOpener::macos()),
        "windows" => Box::new(CommandOpener::windows()),
        "linux" => Box::new(CommandOpener::linux()),
        other => Box::new(UnsupportedOpener::new(other)),
    }
}

/// 当前宿主系统对应的实现
pub fn for_host() -> Box<dyn FolderOpener> {
    for_os(std::env::consts::OS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_opener_programs() {
        assert_eq!(CommandOpener::macos().program(), "open");
        assert_eq!(CommandOpener::windows().program(), "explorer");
        assert_eq!(CommandOpener::linux().program(), "xdg-open");
    }

    #[test]
    fn test_unsupported_os_reports_error() {
        let opener = for_os("haiku");
        let err = opener.open_folder(Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, OpenFolderError::UnsupportedPlatform(ref os) if os == "haiku"));
        assert_eq!(err.to_string(), "不支持的操作系统: haiku");
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let opener = CommandOpener {
            program: "definitely-not-a-real-file-manager",
        };
        let err = opener.open_folder(Path::new(".")).unwrap_err();
        assert!(matches!(err, OpenFolderError::Launch(_)));
    }
}
