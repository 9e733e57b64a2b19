// 原子写入
//
// 先写临时文件，再替换目标文件。任一步失败时目标文件要么是旧内容，要么不存在，
// 不会留下写了一半的文件。

use std::io;
use std::path::{Path, PathBuf};

/// 原子地把 `content` 写入 `path`
///
/// 目标已存在时先备份到 `<name>.bak`，替换成功后删除备份；替换失败则从备份恢复。
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = sibling_with_suffix(path, "tmp");
    let backup_path = sibling_with_suffix(path, "bak");

    tracing::debug!("写入临时文件: {:?}", temp_path);
    if let Err(e) = std::fs::write(&temp_path, content) {
        tracing::error!("写入临时文件失败: {}", e);
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    // Windows 上 rename 不能覆盖已存在的文件，先把旧文件挪到 .bak
    if path.exists() {
        if backup_path.exists() {
            let _ = std::fs::remove_file(&backup_path);
        }
        if let Err(e) = std::fs::rename(path, &backup_path) {
            tracing::error!("备份旧文件失败: {}", e);
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }
    }

    match std::fs::rename(&temp_path, path) {
        Ok(()) => {
            let _ = std::fs::remove_file(&backup_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!("重命名临时文件失败: {}", e);
            let _ = std::fs::remove_file(&temp_path);
            if backup_path.exists() {
                if let Err(restore_err) = std::fs::rename(&backup_path, path) {
                    tracing::error!("恢复备份失败: {}", restore_err);
                } else {
                    tracing::info!("已从备份恢复: {:?}", path);
                }
            }
            Err(e)
        }
    }
}

/// `foo.xlsx` -> `foo.xlsx.tmp`
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        write_atomic(&path, b"{}").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
        assert!(!dir.path().join("settings.json.tmp").exists());
        assert!(!dir.path().join("settings.json.bak").exists());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.xlsx");
        std::fs::write(&path, b"old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert!(!dir.path().join("a.xlsx.bak").exists());
    }

    #[test]
    fn test_write_atomic_missing_dir_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.xlsx");

        assert!(write_atomic(&path, b"data").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_sibling_with_suffix() {
        let p = Path::new("/tmp/ABC_20260101_120000.xlsx");
        assert_eq!(
            sibling_with_suffix(p, "tmp"),
            PathBuf::from("/tmp/ABC_20260101_120000.xlsx.tmp")
        );
    }
}
