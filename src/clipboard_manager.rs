// src/clipboard_manager.rs
//
// 剪贴板读取 - 直接取用户刚复制的追溯码列表

use anyhow::Result;
use arboard::Clipboard;

/// 读取剪贴板中的文本
///
/// # 返回值
/// * `Ok(Some(text))` - 剪贴板中有非空文本
/// * `Ok(None)` - 剪贴板为空或内容不是文本
/// * `Err(e)` - 无法访问剪贴板
pub fn read_clipboard_text() -> Result<Option<String>> {
    let mut clipboard = Clipboard::new()?;

    match clipboard.get_text() {
        Ok(text) if !text.trim().is_empty() => {
            tracing::info!("clipboard_manager: 读取到剪贴板文本 (长度: {} 字符)", text.chars().count());
            Ok(Some(text))
        }
        Ok(_) => {
            tracing::debug!("clipboard_manager: 剪贴板为空");
            Ok(None)
        }
        Err(arboard::Error::ContentNotAvailable) => {
            tracing::debug!("clipboard_manager: 剪贴板中没有文本内容");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
