//! 题目切分
//!
//! 把一段文本（全卷或某个题组正文）按题号切成逐题切块。
//! 题号锚点的搜索是整条管线最脆弱的环节：题号绝不能是
//! 更大数字的子串，且后一题的锚点必须出现在前一题锚点
//! 之后（选项文字里出现的数字不得被误认为锚点）。
//!
//! 锚点策略按固定优先级尝试，命中者记录在切块上；
//! 两个策略都要求题号处于词边界：
//! 1. `number-option`  —— 题号后紧跟（或隔空白跟）选项字母
//! 2. `number-boundary` —— 题号后接题干文字

use crate::models::QuestionChunk;
use crate::pipeline::normalizer::canonical_option_letter;
use regex::Regex;
use std::ops::RangeInclusive;

/// 策略一：题号后为选项字母（克漏字/词汇题的典型版式）
pub const STRATEGY_NUMBER_OPTION: &str = "number-option";
/// 策略二：题号处于词边界，后接题干内容
pub const STRATEGY_NUMBER_BOUNDARY: &str = "number-boundary";

/// 题目切分器
pub struct Segmenter {
    digit_run: Regex,
}

struct Anchor {
    byte_start: usize,
    byte_end: usize,
    strategy: &'static str,
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            // regex 不支持环视；改为扫描极大数字串，
            // 天然保证题号不是更大数字的子串
            digit_run: Regex::new(r"\d+").expect("内建数字正则应当有效"),
        }
    }

    /// 把一段文本按题号区间切成切块
    ///
    /// # 参数
    /// - `span`: 已归一化的文本片段
    /// - `range`: 要寻找的题号闭区间
    ///
    /// # 返回
    /// 区间内每个题号一个切块；找不到锚点的题号产出
    /// `found == false` 的占位块，从不静默跳过。
    pub fn segment(&self, span: &str, range: RangeInclusive<u32>) -> Vec<QuestionChunk> {
        // 一次性收集所有极大数字串：(起始, 结束, 数值)
        let runs: Vec<(usize, usize, u64)> = self
            .digit_run
            .find_iter(span)
            .filter_map(|m| m.as_str().parse::<u64>().ok().map(|v| (m.start(), m.end(), v)))
            .collect();

        let numbers: Vec<u32> = range.collect();
        let mut anchors: Vec<Option<Anchor>> = Vec::with_capacity(numbers.len());

        // 游标：锚点只能出现在前一题锚点的数字之后，
        // 绝不回头认领已经属于前面切块的文字
        let mut cursor = 0usize;
        for &n in &numbers {
            let anchor = self.find_anchor(span, &runs, n, cursor);
            if let Some(a) = &anchor {
                cursor = a.byte_end;
            }
            anchors.push(anchor);
        }

        // 切块文字：本题锚点到下一个找到锚点的题号为止
        let mut chunks = Vec::with_capacity(numbers.len());
        for (i, &n) in numbers.iter().enumerate() {
            match &anchors[i] {
                Some(anchor) => {
                    let end = anchors[i + 1..]
                        .iter()
                        .flatten()
                        .map(|a| a.byte_start)
                        .next()
                        .unwrap_or(span.len());
                    chunks.push(QuestionChunk {
                        number: n,
                        raw_text: span[anchor.byte_start..end].trim().to_string(),
                        offset: anchor.byte_start,
                        found: true,
                        is_grouped: false,
                        group_ref: None,
                        strategy: Some(anchor.strategy),
                    });
                }
                None => chunks.push(QuestionChunk::not_found(n)),
            }
        }

        chunks
    }

    /// 在 `cursor` 之后为题号 `n` 寻找锚点
    ///
    /// 先整体尝试策略一，失败后再整体尝试策略二；
    /// 同一策略内取最早的候选（前一题边界之后的首次出现）。
    fn find_anchor(
        &self,
        span: &str,
        runs: &[(usize, usize, u64)],
        n: u32,
        cursor: usize,
    ) -> Option<Anchor> {
        let candidates: Vec<&(usize, usize, u64)> = runs
            .iter()
            .filter(|(start, _, value)| *start >= cursor && *value == n as u64)
            .collect();

        for &&(start, end, _) in &candidates {
            if self.is_reference_context(span, start, end) {
                continue;
            }
            // 词边界是两个策略共同的硬条件：选项文字尾部的
            // 数字（如 "A甲1" 的 1）后面也可能紧跟下一个选项
            // 字母，仅凭后继字符无法排除
            if at_token_boundary(span, start) && followed_by_option_letter(span, end) {
                return Some(Anchor {
                    byte_start: start,
                    byte_end: end,
                    strategy: STRATEGY_NUMBER_OPTION,
                });
            }
        }

        for &&(start, end, _) in &candidates {
            if self.is_reference_context(span, start, end) {
                continue;
            }
            if at_token_boundary(span, start) && followed_by_prompt_text(span, end) {
                return Some(Anchor {
                    byte_start: start,
                    byte_end: end,
                    strategy: STRATEGY_NUMBER_BOUNDARY,
                });
            }
        }

        None
    }

    /// 题号引用语境（"第3題"、"每題2分"一类）不是锚点
    fn is_reference_context(&self, span: &str, start: usize, end: usize) -> bool {
        if let Some(prev) = span[..start].chars().next_back() {
            if prev == '第' {
                return true;
            }
        }
        if let Some(next) = span[end..].chars().next() {
            if next == '題' || next == '分' || next == '页' || next == '頁' {
                return true;
            }
        }
        false
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// 数字串之后（允许隔一段空白）是否为选项字母
fn followed_by_option_letter(span: &str, end: usize) -> bool {
    let mut rest = span[end..].chars();
    loop {
        match rest.next() {
            Some(c) if c.is_whitespace() => continue,
            Some(c) => return canonical_option_letter(c).is_some(),
            None => return false,
        }
    }
}

/// 数字串之后是否接题干内容（空白或分隔符再接非数字文字）
fn followed_by_prompt_text(span: &str, end: usize) -> bool {
    let mut chars = span[end..].chars();
    match chars.next() {
        Some(c) if c.is_whitespace() || matches!(c, '.' | '、' | '．' | ')' | '）') => {
            matches!(chars.next(), Some(next) if !next.is_ascii_digit())
        }
        _ => false,
    }
}

/// 数字串是否处于词边界（片段开头或前为空白）
fn at_token_boundary(span: &str, start: usize) -> bool {
    match span[..start].chars().next_back() {
        None => true,
        Some(prev) => prev.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers_found(chunks: &[QuestionChunk]) -> Vec<u32> {
        chunks.iter().filter(|c| c.found).map(|c| c.number).collect()
    }

    #[test]
    fn test_basic_segmentation() {
        let seg = Segmenter::new();
        let span = "1 A甲 B乙 C丙 D丁 2 A戊 B己 C庚 D辛";
        let chunks = seg.segment(span, 1..=2);
        assert_eq!(numbers_found(&chunks), vec![1, 2]);
        assert_eq!(chunks[0].raw_text, "1 A甲 B乙 C丙 D丁");
        assert_eq!(chunks[1].raw_text, "2 A戊 B己 C庚 D辛");
        assert_eq!(chunks[0].strategy, Some(STRATEGY_NUMBER_OPTION));
    }

    #[test]
    fn test_missing_number_yields_placeholder() {
        let seg = Segmenter::new();
        let span = "1 A甲 B乙 3 A丙 B丁";
        let chunks = seg.segment(span, 1..=3);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].found);
        assert!(!chunks[1].found);
        assert!(chunks[1].raw_text.is_empty());
        assert!(chunks[2].found);
        // 第1题的切块延伸到第3题的锚点
        assert_eq!(chunks[0].raw_text, "1 A甲 B乙");
    }

    #[test]
    fn test_number_not_substring_of_larger_number() {
        let seg = Segmenter::new();
        // "12" 不能被当作题号 1 或 2 的锚点
        let span = "12 A甲 B乙 C丙 D丁";
        let chunks = seg.segment(span, 1..=2);
        assert!(!chunks[0].found);
        assert!(!chunks[1].found);
        let chunks = seg.segment(span, 12..=12);
        assert!(chunks[0].found);
    }

    #[test]
    fn test_number_inside_option_text_not_claimed() {
        let seg = Segmenter::new();
        // 平手规则：取前一题锚点之后的首次合法出现，
        // 绝不认领已经属于前面切块的文字
        let span = "1 A西元 2 A入侵 B乙 C丙 D丁 2 A戊 B己 C庚 D辛";
        let chunks = seg.segment(span, 1..=2);
        assert!(chunks[0].found);
        assert!(chunks[1].found);
        // 第2题的锚点是第1题锚点之后的第一次出现
        assert!(chunks[1].raw_text.starts_with("2 A入侵"));
    }

    #[test]
    fn test_option_tail_digit_not_an_anchor() {
        let seg = Segmenter::new();
        // 选项文字尾部的数字（甲1、甲2）隔空白就是下一个选项
        // 字母，不处于词边界，不得抢走题干式锚点
        let span = "1 下列敘述何者正確 A甲1 B甲2 C甲3 D甲4 2 下列何者有誤 A乙1 B乙2 C乙3 D乙4";
        let chunks = seg.segment(span, 1..=2);
        assert_eq!(chunks[0].strategy, Some(STRATEGY_NUMBER_BOUNDARY));
        assert_eq!(chunks[0].raw_text, "1 下列敘述何者正確 A甲1 B甲2 C甲3 D甲4");
        assert!(chunks[1].raw_text.starts_with("2 下列何者有誤"));
    }

    #[test]
    fn test_reference_number_skipped() {
        let seg = Segmenter::new();
        // "第2題" 的 2 是引用，不是锚点
        let span = "1 承第2題 A甲 B乙 C丙 D丁 2 A戊 B己 C庚 D辛";
        let chunks = seg.segment(span, 1..=2);
        assert!(chunks[1].found);
        assert!(chunks[1].raw_text.starts_with("2 A戊"));
    }

    #[test]
    fn test_prompt_style_question_uses_fallback_strategy() {
        let seg = Segmenter::new();
        let span = "5 下列敘述何者正確 A甲 B乙 C丙 D丁 6 請寫出你的看法";
        let chunks = seg.segment(span, 5..=6);
        assert!(chunks[0].found);
        assert_eq!(chunks[0].strategy, Some(STRATEGY_NUMBER_BOUNDARY));
        assert!(chunks[1].found);
        assert_eq!(chunks[1].raw_text, "6 請寫出你的看法");
    }

    #[test]
    fn test_empty_span() {
        let seg = Segmenter::new();
        let chunks = seg.segment("", 1..=3);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| !c.found));
    }

    #[test]
    fn test_chunk_runs_to_end_of_span() {
        let seg = Segmenter::new();
        let span = "1 A甲 B乙 C丙 D丁";
        let chunks = seg.segment(span, 1..=1);
        assert_eq!(chunks[0].raw_text, span);
    }
}
