//! 追溯码处理核心
//!
//! 把粘贴进来的原始文本变成可导出的追溯码批次。
//!
//! ## 处理流程
//! 1. 按行切分，去除首尾空白，丢弃空行
//! 2. 识别粘连码（40 位纯数字 = 两个 20 位追溯码），拆成两条
//! 3. 保序去重，并统计总数/唯一/重复

mod dedup;
mod parser;
mod types;

pub use dedup::deduplicate;
pub use parser::{looks_like_trace_code, parse_codes, parse_line};
pub use types::{
    CodeStats, DeduplicatedBatch, ExportRecord, ParsedLine, CONCATENATED_PAIR_LEN, TRACE_CODE_LEN,
};
