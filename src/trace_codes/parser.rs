// 追溯码解析
//
// 扫码枪或复制粘贴时偶尔会漏掉换行，两个 20 位码粘成一个 40 位数字串。
// 这里只识别这一种粘连；其余内容原样透传，不做任何校验。

use super::types::{ParsedLine, CONCATENATED_PAIR_LEN, TRACE_CODE_LEN};

/// 解析单行文本
pub fn parse_line(line: &str) -> ParsedLine<'_> {
    let cleaned = line.trim_matches(is_strippable);
    if cleaned.is_empty() {
        return ParsedLine::Blank;
    }

    if is_concatenated_pair(cleaned) {
        // 全角数字占多个字节，按第 20 个字符的位置切分
        if let Some((split, _)) = cleaned.char_indices().nth(TRACE_CODE_LEN) {
            let (first, second) = cleaned.split_at(split);
            return ParsedLine::Pair(first, second);
        }
    }

    ParsedLine::Single(cleaned)
}

/// 把整段粘贴文本解析为追溯码序列（保持原顺序，可能含重复）
pub fn parse_codes(text: &str) -> Vec<String> {
    let mut codes = Vec::new();
    let mut split_pairs = 0usize;

    for line in text.split('\n') {
        let parsed = parse_line(line);
        if let ParsedLine::Pair(first, second) = parsed {
            tracing::debug!("拆分粘连追溯码: {} + {}", first, second);
            split_pairs += 1;
        }
        codes.extend(parsed.codes().map(str::to_string));
    }

    if split_pairs > 0 {
        tracing::info!("共拆分 {} 组粘连追溯码", split_pairs);
    }

    codes
}

/// 是否为标准 20 位数字追溯码
///
/// 仅用于统计提示，不会据此丢弃任何码
pub fn looks_like_trace_code(code: &str) -> bool {
    code.len() == TRACE_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// 行首尾需要去掉的字符：Unicode 空白，以及 0x1C..=0x1F 分隔控制符
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// 40 个字符且全为数字（含全角数字）
fn is_concatenated_pair(cleaned: &str) -> bool {
    cleaned.chars().count() == CONCATENATED_PAIR_LEN && cleaned.chars().all(char::is_numeric)
}
