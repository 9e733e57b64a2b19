// 表单控制器
//
// 持有一次会话中的可变状态（企业名称、粘贴的追溯码、状态栏文本），
// 把界面上的每个动作转成一次同步调用：生成表格、重置、选择存储路径、打开文件夹。
// 界面层只负责收集输入和展示结果。

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDateTime};

use crate::config::{AppConfig, ConfigStore};
use crate::error::{GenerateError, OpenFolderError, ValidationError};
use crate::folder_opener::FolderOpener;
use crate::trace_codes::{self, CodeStats, DeduplicatedBatch};
use crate::xlsx_export;

pub const STATUS_READY: &str = "就绪";
pub const STATUS_RESET: &str = "已重置";

/// 通过校验的输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub company: String,
    pub batch: DeduplicatedBatch,
}

/// 校验输入并完成解析、去重
///
/// 依次检查：企业名称非空、追溯码文本非空、解析后至少有一条码
pub fn validate_input(company: &str, codes_text: &str) -> Result<ValidatedInput, ValidationError> {
    let company = company.trim();
    if company.is_empty() {
        return Err(ValidationError::MissingCompany);
    }

    let codes_text = codes_text.trim();
    if codes_text.is_empty() {
        return Err(ValidationError::MissingCodes);
    }

    let codes = trace_codes::parse_codes(codes_text);
    if codes.is_empty() {
        return Err(ValidationError::NoValidCodes);
    }

    Ok(ValidatedInput {
        company: company.to_string(),
        batch: trace_codes::deduplicate(codes),
    })
}

/// 一次成功的 "生成表格" 结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub file_name: String,
    pub path: PathBuf,
    pub stats: CodeStats,
    /// 不是 20 位纯数字的码（照常导出，仅作提示）
    pub nonstandard_count: usize,
}

impl GenerateReport {
    /// 状态栏文本
    pub fn status_line(&self) -> String {
        format!(
            "成功生成: {} | 总数: {}, 唯一: {}, 重复: {}",
            self.file_name,
            self.stats.total_count,
            self.stats.unique_count,
            self.stats.duplicate_count
        )
    }
}

/// "打开文件夹" 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFolderOutcome {
    /// 目录已存在并已打开
    Opened,
    /// 目录不存在，已创建并打开
    CreatedAndOpened,
    /// 目录不存在，用户选择不创建
    Declined,
}

pub struct FormController {
    company_name: String,
    codes_text: String,
    status: String,
    config: AppConfig,
    store: ConfigStore,
    opener: Box<dyn FolderOpener>,
}

impl FormController {
    pub fn new(config: AppConfig, store: ConfigStore, opener: Box<dyn FolderOpener>) -> Self {
        Self {
            company_name: String::new(),
            codes_text: String::new(),
            status: STATUS_READY.to_string(),
            config,
            store,
            opener,
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) {
        self.company_name = name.into();
    }

    pub fn codes_text(&self) -> &str {
        &self.codes_text
    }

    pub fn set_codes_text(&mut self, text: impl Into<String>) {
        self.codes_text = text.into();
    }

    /// 追加粘贴内容（与已有内容之间补一个换行）
    pub fn append_codes_text(&mut self, text: &str) {
        if !self.codes_text.is_empty() && !self.codes_text.ends_with('\n') {
            self.codes_text.push('\n');
        }
        self.codes_text.push_str(text);
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_path
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 选择新的存储路径并立即保存设置
    pub fn choose_output_dir(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        let mut updated = self.config.clone();
        updated.output_path = dir.into();
        self.store.save(&updated)?;
        tracing::info!("存储路径已更新: {:?}", updated.output_path);
        self.config = updated;
        Ok(())
    }

    /// 生成表格（使用当前本地时间命名文件）
    pub fn generate(&mut self) -> Result<GenerateReport, GenerateError> {
        self.generate_at(Local::now().naive_local())
    }

    /// 生成表格
    ///
    /// 校验失败时不改变任何状态；写文件失败时状态栏显示错误，输入保持不变。
    pub fn generate_at(&mut self, now: NaiveDateTime) -> Result<GenerateReport, GenerateError> {
        let input = match validate_input(&self.company_name, &self.codes_text) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!("输入校验失败: {}", e);
                return Err(e.into());
            }
        };

        let exported = match xlsx_export::export_batch(
            &self.config.output_path,
            &input.company,
            &input.batch,
            now,
        ) {
            Ok(exported) => exported,
            Err(e) => {
                tracing::error!("生成表格时出错: {}", e);
                self.status = format!("生成失败: {}", e);
                return Err(e.into());
            }
        };

        let nonstandard_count = input
            .batch
            .codes
            .iter()
            .filter(|c| !trace_codes::looks_like_trace_code(c))
            .count();
        if nonstandard_count > 0 {
            tracing::warn!("有 {} 条追溯码不是 20 位数字，已原样导出", nonstandard_count);
        }

        let report = GenerateReport {
            file_name: exported.file_name,
            path: exported.path,
            stats: input.batch.stats,
            nonstandard_count,
        };
        self.status = report.status_line();
        tracing::info!("{}", self.status);
        Ok(report)
    }

    /// 清空企业名称和追溯码
    pub fn reset(&mut self) {
        self.company_name.clear();
        self.codes_text.clear();
        self.status = STATUS_RESET.to_string();
        tracing::info!("表单已重置");
    }

    /// 在文件管理器中打开存储路径
    ///
    /// 目录不存在时通过 `confirm_create` 询问是否创建。
    pub fn open_folder(
        &self,
        confirm_create: impl FnOnce(&Path) -> bool,
    ) -> Result<OpenFolderOutcome, OpenFolderError> {
        let dir = self.config.output_path.as_path();
        if dir.exists() {
            self.opener.open_folder(dir)?;
            return Ok(OpenFolderOutcome::Opened);
        }

        if !confirm_create(dir) {
            tracing::info!("存储路径不存在，用户取消创建: {:?}", dir);
            return Ok(OpenFolderOutcome::Declined);
        }

        std::fs::create_dir_all(dir).map_err(|source| OpenFolderError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        tracing::info!("已创建存储路径: {:?}", dir);
        self.opener.open_folder(dir)?;
        Ok(OpenFolderOutcome::CreatedAndOpened)
    }
}
