use std::collections::BTreeMap;

/// 答案映射
///
/// 由答案文档与更正文档各自独立解析而来。两张映射只做
/// 题号级覆盖（更正优先），从不逐字段合并。
#[derive(Debug, Clone, Default)]
pub struct AnswerKey {
    /// 原始公布答案：题号 → 字母
    pub primary: BTreeMap<u32, char>,
    /// 更正答案：题号 → 字母
    pub corrections: BTreeMap<u32, char>,
    /// 解析过程中产生的警告（重复条目等）
    pub warnings: Vec<String>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并规则：更正优先，其次原始答案，否则无
    pub fn final_answer(&self, number: u32) -> Option<char> {
        self.corrections
            .get(&number)
            .or_else(|| self.primary.get(&number))
            .copied()
    }

    /// 两张映射是否都为空（答案来源缺失时合法）
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.corrections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_rule_correction_overrides() {
        let mut key = AnswerKey::new();
        key.primary.insert(1, 'A');
        key.primary.insert(2, 'B');
        key.primary.insert(3, 'C');
        key.corrections.insert(1, 'B');

        assert_eq!(key.final_answer(1), Some('B'));
        assert_eq!(key.final_answer(2), Some('B'));
        assert_eq!(key.final_answer(3), Some('C'));
        assert_eq!(key.final_answer(4), None);
    }
}
