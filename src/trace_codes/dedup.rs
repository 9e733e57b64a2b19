// 保序去重
//
// 只保留每个追溯码第一次出现的位置，比较为精确字符串相等（区分大小写）。

use std::collections::HashSet;

use super::types::{CodeStats, DeduplicatedBatch};

/// 对追溯码序列去重并统计
pub fn deduplicate(codes: Vec<String>) -> DeduplicatedBatch {
    let total_count = codes.len();
    let mut seen: HashSet<&str> = HashSet::with_capacity(total_count);
    let unique: Vec<String> = codes
        .iter()
        .filter(|code| seen.insert(code.as_str()))
        .cloned()
        .collect();

    let unique_count = unique.len();
    let stats = CodeStats {
        total_count,
        unique_count,
        duplicate_count: total_count - unique_count,
    };

    if stats.duplicate_count > 0 {
        tracing::info!(
            "去重完成: 总数 {}, 唯一 {}, 重复 {}",
            stats.total_count,
            stats.unique_count,
            stats.duplicate_count
        );
    }

    DeduplicatedBatch {
        codes: unique,
        stats,
    }
}
