// src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::atomic_file::write_atomic;

// ============================================================================
// 常量
// ============================================================================

/// 配置目录名（位于系统配置目录下）
const APP_DIR_NAME: &str = "TraceCodeTool";

/// 配置文件名
const CONFIG_FILE_NAME: &str = "settings.json";

/// 默认输出文件夹名（位于 ~/Documents 下）
const DEFAULT_OUTPUT_DIR_NAME: &str = "追溯码输出";

// ============================================================================
// 应用配置
// ============================================================================

/// 应用配置
///
/// 目前只持久化一项：表格输出目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 表格输出目录
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

/// 默认输出目录：`<home>/Documents/追溯码输出`
pub fn default_output_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join("Documents").join(DEFAULT_OUTPUT_DIR_NAME)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

// ============================================================================
// 配置存储
// ============================================================================

/// 配置文件的读写入口
///
/// 由调用方显式创建并交给表单控制器，不使用全局状态
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// 使用指定的配置文件路径（测试中指向临时目录）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 系统默认位置：`<config_dir>/TraceCodeTool/settings.json`
    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        Ok(Self::new(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载配置
    ///
    /// 返回 `(配置, 是否回退到了默认值)`。文件损坏或结构不匹配时不报错，
    /// 调用者可根据第二个值决定是否重新保存。
    pub fn load(&self) -> Result<(AppConfig, bool)> {
        tracing::info!("尝试从以下路径加载配置: {:?}", self.path);

        if !self.path.exists() {
            tracing::warn!("配置文件不存在，使用默认配置");
            return Ok((AppConfig::new(), false));
        }

        let content = std::fs::read_to_string(&self.path)?;

        // 先解析为 Value，区分 "不是 JSON" 和 "结构不对" 两种情况
        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("配置文件不是合法 JSON，使用默认配置: {}", e);
                return Ok((AppConfig::new(), true));
            }
        };

        match serde_json::from_value::<AppConfig>(value) {
            Ok(config) => {
                tracing::info!("配置加载成功");
                Ok((config, false))
            }
            Err(e) => {
                tracing::warn!("配置结构不匹配，使用默认配置: {}", e);
                Ok((AppConfig::new(), true))
            }
        }
    }

    /// 保存配置（原子写入）
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        tracing::info!("保存配置到: {:?}", self.path);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, content.as_bytes())?;

        tracing::info!("配置保存成功");
        Ok(())
    }
}
