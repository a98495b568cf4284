//! 答案调和
//!
//! 把答案文档与更正文档各自解析成 题号 → 字母 的映射，
//! 再按"更正优先"合并进题目记录。更正条目必须伴随
//! 更正标记词，裸的 `题号 字母` 绝不当作更正——否则普通
//! 答案表的排版就会产生误报。

use crate::models::AnswerKey;
use crate::pipeline::normalizer::canonical_option_letter;
use regex::Regex;
use tracing::debug;

/// 命名答案模式：按固定优先级尝试
struct AnswerStrategy {
    name: &'static str,
    regex: Regex,
}

struct AnswerHit {
    byte_start: usize,
    byte_end: usize,
    number: u32,
    letter: char,
    strategy: &'static str,
}

/// 答案调和器
pub struct AnswerReconciler {
    primary_strategies: Vec<AnswerStrategy>,
    correction_strategies: Vec<AnswerStrategy>,
}

impl AnswerReconciler {
    pub fn new() -> Self {
        // 原始答案：`第N題 X` 说法优先，其次带分隔符，最后纯空白
        let primary = [
            (
                "ti-phrase",
                r"第\s*(\d+)\s*題\s*[:：．.]?\s*([A-DＡ-Ｄ])",
            ),
            ("num-sep", r"(\d+)\s*[.)）:：．、]\s*([A-DＡ-Ｄ])"),
            ("num-space", r"(\d+)\s+([A-DＡ-Ｄ])"),
        ];

        // 更正答案：模式自身必须包含更正标记词，
        // 保证"在匹配范围内共现"这一硬性要求
        let corrections = [
            (
                "correction-ti",
                r"第\s*(\d+)\s*題[的之]?(?:答案)?\s*(?:更正|修正|訂正|更改)\s*為?为?\s*[:：]?\s*([A-DＡ-Ｄ])",
            ),
            (
                "correction-lead",
                r"(?:更正|修正|訂正)\s*[:：]?\s*第\s*(\d+)\s*題\s*(?:答案)?\s*為?为?\s*[:：]?\s*([A-DＡ-Ｄ])",
            ),
            (
                "correction-list",
                r"(?:更正|修正|訂正)[^0-9]{0,8}(\d+)\s*[.)）:：]?\s*([A-DＡ-Ｄ])",
            ),
        ];

        Self {
            primary_strategies: compile(&primary),
            correction_strategies: compile(&corrections),
        }
    }

    /// 解析并合并两份答案来源
    ///
    /// # 参数
    /// - `answer_text`: 答案文档全文（可缺）
    /// - `corrections_text`: 更正文档全文（可缺）
    ///
    /// # 返回
    /// 合并后的 [`AnswerKey`]；来源缺失不是错误，
    /// 相应映射为空即可。
    pub fn reconcile(
        &self,
        answer_text: Option<&str>,
        corrections_text: Option<&str>,
    ) -> AnswerKey {
        let mut key = AnswerKey::new();

        if let Some(text) = answer_text {
            extract_entries(
                &self.primary_strategies,
                text,
                "答案",
                &mut key.primary,
                &mut key.warnings,
            );
        }
        if let Some(text) = corrections_text {
            extract_entries(
                &self.correction_strategies,
                text,
                "更正",
                &mut key.corrections,
                &mut key.warnings,
            );
        }

        key
    }
}

impl Default for AnswerReconciler {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(patterns: &[(&'static str, &'static str)]) -> Vec<AnswerStrategy> {
    patterns
        .iter()
        .map(|&(name, pattern)| AnswerStrategy {
            name,
            regex: Regex::new(pattern).expect("内建答案正则应当有效"),
        })
        .collect()
}

/// 按策略优先级收集条目，按文档顺序写入映射
///
/// 低优先级策略不得重匹配已被认领的文字区域；
/// 同一题号出现多次时后写覆盖先写，并记一条警告。
fn extract_entries(
    strategies: &[AnswerStrategy],
    text: &str,
    kind_label: &str,
    map: &mut std::collections::BTreeMap<u32, char>,
    warnings: &mut Vec<String>,
) {
    let mut hits: Vec<AnswerHit> = Vec::new();
    let mut claimed: Vec<(usize, usize)> = Vec::new();

    for strategy in strategies {
        for caps in strategy.regex.captures_iter(text) {
            let whole = caps.get(0).expect("捕获组0总是存在");
            if claimed
                .iter()
                .any(|&(s, e)| whole.start() < e && whole.end() > s)
            {
                continue;
            }
            let Some(number) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
                continue;
            };
            let Some(letter) = caps
                .get(2)
                .and_then(|m| m.as_str().chars().next())
                .and_then(canonical_option_letter)
            else {
                continue;
            };
            claimed.push((whole.start(), whole.end()));
            hits.push(AnswerHit {
                byte_start: whole.start(),
                byte_end: whole.end(),
                number,
                letter,
                strategy: strategy.name,
            });
        }
    }

    // 文档顺序决定"最后写入"的语义
    hits.sort_by_key(|h| h.byte_start);
    for hit in hits {
        debug!(
            "{}条目: 第{}題 → {} (策略 {}, 位置 {}..{})",
            kind_label, hit.number, hit.letter, hit.strategy, hit.byte_start, hit.byte_end
        );
        if map.insert(hit.number, hit.letter).is_some() {
            warnings.push(format!(
                "{}中第{}題出现重复条目，采用后出现的 {}",
                kind_label, hit.number, hit.letter
            ));
        }
    }
}
