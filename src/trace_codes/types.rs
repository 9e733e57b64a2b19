// 追溯码核心类型定义
//
// - 单行解析结果 (ParsedLine)
// - 去重后的批次及统计 (DeduplicatedBatch / CodeStats)
// - 导出记录 (ExportRecord)

/// 标准追溯码长度（20 位数字）
pub const TRACE_CODE_LEN: usize = 20;

/// 粘连码长度：两个追溯码之间漏掉了换行
pub const CONCATENATED_PAIR_LEN: usize = TRACE_CODE_LEN * 2;

/// 单行文本的解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// 空行或纯空白行，直接丢弃
    Blank,
    /// 普通的一条码（不做长度/数字校验，原样保留）
    Single(&'a str),
    /// 粘连码，拆分后的前后两段
    Pair(&'a str, &'a str),
}

impl<'a> ParsedLine<'a> {
    /// 按原顺序展开为码列表
    pub fn codes(self) -> impl Iterator<Item = &'a str> {
        let (first, second) = match self {
            ParsedLine::Blank => (None, None),
            ParsedLine::Single(code) => (Some(code), None),
            ParsedLine::Pair(first, second) => (Some(first), Some(second)),
        };
        first.into_iter().chain(second)
    }
}

/// 去重统计
///
/// 恒有 `total_count == unique_count + duplicate_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodeStats {
    pub total_count: usize,
    pub unique_count: usize,
    pub duplicate_count: usize,
}

/// 去重后的追溯码批次（保留首次出现的顺序）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeduplicatedBatch {
    pub codes: Vec<String>,
    pub stats: CodeStats,
}

impl DeduplicatedBatch {
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// 为每个追溯码生成一条导出记录，企业名称在整批中相同
    pub fn records<'a>(&'a self, company: &'a str) -> impl Iterator<Item = ExportRecord<'a>> + 'a {
        self.codes.iter().map(move |code| ExportRecord {
            company,
            trace_code: code,
        })
    }
}

/// 一行导出数据：企业名称 + 追溯码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRecord<'a> {
    pub company: &'a str,
    pub trace_code: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_line_codes_order() {
        assert_eq!(ParsedLine::Blank.codes().count(), 0);
        assert_eq!(ParsedLine::Single("abc").codes().collect::<Vec<_>>(), vec!["abc"]);
        assert_eq!(
            ParsedLine::Pair("first", "second").codes().collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_records_repeat_company() {
        let batch = DeduplicatedBatch {
            codes: vec!["1".to_string(), "2".to_string()],
            stats: CodeStats {
                total_count: 2,
                unique_count: 2,
                duplicate_count: 0,
            },
        };

        let records: Vec<_> = batch.records("ABC Hospital").collect();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.company == "ABC Hospital"));
        assert_eq!(records[1].trace_code, "2");
    }
}
