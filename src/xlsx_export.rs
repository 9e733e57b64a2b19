//! XLSX 导出
//!
//! 每次导出生成一个工作簿，只有一个 sheet：
//! - 表头两列：企业名称、追溯码
//! - 每个唯一追溯码一行，企业名称逐行重复
//!
//! 文件名为 `<企业名称>_<YYYYMMDD_HHMMSS>.xlsx`，先在内存中生成，再原子写入输出目录。

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook};

use crate::atomic_file::write_atomic;
use crate::error::ExportError;
use crate::trace_codes::DeduplicatedBatch;

pub const SHEET_NAME: &str = "追溯码数据";
pub const HEADER_COMPANY: &str = "企业名称";
pub const HEADER_TRACE_CODE: &str = "追溯码";

/// 列宽上限（字符）
const MAX_COLUMN_WIDTH: usize = 50;
/// 列宽在最长内容之外留出的余量
const COLUMN_PADDING: usize = 2;

/// 文件名中不允许出现的字符
const FORBIDDEN_FILE_NAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// 一次成功导出的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// 生成导出文件名
pub fn export_file_name(company: &str, generated_at: NaiveDateTime) -> Result<String, ExportError> {
    if company.is_empty()
        || company
            .chars()
            .any(|c| c.is_control() || FORBIDDEN_FILE_NAME_CHARS.contains(&c))
    {
        return Err(ExportError::InvalidFileName(company.to_string()));
    }
    Ok(format!(
        "{}_{}.xlsx",
        company,
        generated_at.format("%Y%m%d_%H%M%S")
    ))
}

/// 把一批追溯码导出为表格文件
///
/// 输出目录不存在时会递归创建。任何一步失败都不会在目录中留下目标文件。
pub fn export_batch(
    output_dir: &Path,
    company: &str,
    batch: &DeduplicatedBatch,
    generated_at: NaiveDateTime,
) -> Result<ExportedFile, ExportError> {
    let file_name = export_file_name(company, generated_at)?;
    let buffer = build_workbook(company, batch)?;

    if !output_dir.exists() {
        tracing::info!("输出目录不存在，创建: {:?}", output_dir);
        std::fs::create_dir_all(output_dir).map_err(|source| ExportError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;
    }

    let path = output_dir.join(&file_name);
    write_atomic(&path, &buffer)?;

    tracing::info!("表格已生成: {:?} ({} 行)", path, batch.codes.len());
    Ok(ExportedFile {
        file_name,
        path,
        rows: batch.codes.len(),
    })
}

/// 在内存中构建工作簿，返回 xlsx 字节
fn build_workbook(company: &str, batch: &DeduplicatedBatch) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    worksheet.write_string_with_format(0, 0, HEADER_COMPANY, &header_format)?;
    worksheet.write_string_with_format(0, 1, HEADER_TRACE_CODE, &header_format)?;

    // 追溯码一律按文本写入，避免长数字被 Excel 转成科学计数法
    let mut row: u32 = 1;
    for record in batch.records(company) {
        worksheet.write_string(row, 0, record.company)?;
        worksheet.write_string(row, 1, record.trace_code)?;
        row += 1;
    }

    let company_width = column_width([HEADER_COMPANY, company].into_iter());
    let code_width = column_width(
        std::iter::once(HEADER_TRACE_CODE).chain(batch.codes.iter().map(String::as_str)),
    );
    worksheet.set_column_width(0, company_width as f64)?;
    worksheet.set_column_width(1, code_width as f64)?;

    Ok(workbook.save_to_buffer()?)
}

/// 按最长内容（字符数）计算列宽，并限制上限
fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    let longest = cells.map(|c| c.chars().count()).max().unwrap_or(0);
    (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_codes::{deduplicate, parse_codes};
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::String(s) => s.clone(),
                        other => panic!("期望文本单元格，实际为 {:?}", other),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_export_file_name_format() {
        let name = export_file_name("ABC Hospital", at(9, 5, 3)).unwrap();
        assert_eq!(name, "ABC Hospital_20261018_090503.xlsx");
    }

    #[test]
    fn test_export_file_name_rejects_forbidden_chars() {
        for company in ["A/B", "A\\B", "what?", "a|b", "x\ny", ""] {
            assert!(matches!(
                export_file_name(company, at(0, 0, 0)),
                Err(ExportError::InvalidFileName(_))
            ));
        }
    }

    #[test]
    fn test_column_width_capped() {
        assert_eq!(column_width(["ab", "abcd"].into_iter()), 6);
        let long = "x".repeat(80);
        assert_eq!(column_width(std::iter::once(long.as_str())), MAX_COLUMN_WIDTH);
        // 中文按字符计数
        assert_eq!(column_width(std::iter::once("企业名称")), 6);
    }

    #[test]
    fn test_export_batch_writes_rows() {
        let dir = tempfile::tempdir().unwrap();
        let batch = deduplicate(parse_codes(
            "82050180000352480033\n82050180000576128589\n82050180000352480033",
        ));

        let exported = export_batch(dir.path(), "ABC Hospital", &batch, at(10, 0, 0)).unwrap();

        assert_eq!(exported.file_name, "ABC Hospital_20261018_100000.xlsx");
        assert_eq!(exported.rows, 2);
        assert!(exported.path.exists());

        let rows = read_rows(&exported.path);
        assert_eq!(
            rows,
            vec![
                vec![HEADER_COMPANY.to_string(), HEADER_TRACE_CODE.to_string()],
                vec!["ABC Hospital".to_string(), "82050180000352480033".to_string()],
                vec!["ABC Hospital".to_string(), "82050180000576128589".to_string()],
            ]
        );
    }

    #[test]
    fn test_export_batch_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let batch = deduplicate(vec!["1".to_string()]);

        let exported = export_batch(&nested, "医院", &batch, at(1, 2, 3)).unwrap();

        assert!(nested.is_dir());
        assert_eq!(exported.path, nested.join("医院_20261018_010203.xlsx"));
        let entries = std::fs::read_dir(&nested).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_export_batch_invalid_name_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let batch = deduplicate(vec!["1".to_string()]);

        let result = export_batch(&out, "A/B", &batch, at(1, 2, 3));

        assert!(matches!(result, Err(ExportError::InvalidFileName(_))));
        assert!(!out.exists());
    }

    #[test]
    fn test_export_batch_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let batch = deduplicate(vec!["1".to_string()]);

        let result = export_batch(&blocker.join("out"), "ABC", &batch, at(1, 2, 3));

        assert!(matches!(result, Err(ExportError::CreateDir { .. })));
    }
}
