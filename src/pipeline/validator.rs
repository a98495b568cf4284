//! 结果校验
//!
//! 对照预期题数和结构不变量检查重建出的记录集，产出
//! Success / Warning / Error 三级报告。校验只做描述，
//! 从不修改输入记录；数据质量问题一律进报告，不抛错。

use crate::models::{QuestionKind, QuestionRecord, ValidationReport};
use std::collections::BTreeMap;

/// 空记录集的问题文案（终止性问题）
pub const ISSUE_NO_QUESTIONS: &str = "未擷取到任何題目 (no questions extracted)";

/// 预期题数偏差超过该值时升级为问题
const COUNT_ISSUE_THRESHOLD: usize = 3;
/// 题干短于该字符数时计入警告
const SHORT_PROMPT_CHARS: usize = 5;

/// 结果校验器
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// 校验完整的记录列表
    ///
    /// # 参数
    /// - `records`: 管线重建出的全部题目记录
    /// - `expected_count`: 预期题数（清单或"共N題"声明，可缺）
    pub fn validate(
        &self,
        records: &[QuestionRecord],
        expected_count: Option<u32>,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.set_metric("total_records", records.len());
        if let Some(expected) = expected_count {
            report.set_metric("expected_questions", expected);
        }

        if records.is_empty() {
            report.push_issue(ISSUE_NO_QUESTIONS);
            return report;
        }

        self.check_count(records, expected_count, &mut report);
        self.check_numbering(records, &mut report);
        self.check_prompts(records, &mut report);
        self.check_options(records, &mut report);

        let multiple_choice = records
            .iter()
            .filter(|r| r.kind == QuestionKind::MultipleChoice)
            .count();
        report.set_metric("multiple_choice", multiple_choice);
        report.set_metric("free_response", records.len() - multiple_choice);
        report.set_metric(
            "with_final_answer",
            records.iter().filter(|r| r.final_answer().is_some()).count(),
        );

        report
    }

    /// 预期题数偏差：1-3 为警告，超过 3 为问题
    fn check_count(
        &self,
        records: &[QuestionRecord],
        expected_count: Option<u32>,
        report: &mut ValidationReport,
    ) {
        let Some(expected) = expected_count else {
            return;
        };
        let diff = (records.len() as i64 - expected as i64).unsigned_abs() as usize;
        if diff > COUNT_ISSUE_THRESHOLD {
            report.push_issue(format!(
                "题目数量 {} 与预期 {} 偏差过大（{}）",
                records.len(),
                expected,
                diff
            ));
        } else if diff >= 1 {
            report.push_warning(format!(
                "题目数量 {} 与预期 {} 不符（偏差 {}）",
                records.len(),
                expected,
                diff
            ));
        }
    }

    /// 题号检查：起始题号、重复、缺口
    fn check_numbering(&self, records: &[QuestionRecord], report: &mut ValidationReport) {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for r in records {
            *counts.entry(r.number).or_insert(0) += 1;
        }

        if let Some((&first, _)) = counts.iter().next() {
            if first != 1 {
                report.push_warning(format!("题号未从 1 开始（首题为 {}）", first));
            }
        }

        let duplicates: Vec<String> = counts
            .iter()
            .filter(|(_, &c)| c > 1)
            .map(|(&n, _)| n.to_string())
            .collect();
        if !duplicates.is_empty() {
            report.push_issue(format!("题号重复: {}", duplicates.join(", ")));
        }

        let numbers: Vec<u32> = counts.keys().copied().collect();
        let gaps: Vec<String> = numbers
            .windows(2)
            .filter(|w| w[1] > w[0] + 1)
            .map(|w| format!("{}-{}", w[0], w[1]))
            .collect();
        if !gaps.is_empty() {
            report.set_metric("gap_count", gaps.len());
            report.push_warning(format!("题号序列存在缺口: {}", gaps.join(", ")));
        }
    }

    /// 题干检查：空题干为问题，过短题干为警告
    fn check_prompts(&self, records: &[QuestionRecord], report: &mut ValidationReport) {
        let empty = records
            .iter()
            .filter(|r| r.prompt_text.trim().is_empty())
            .count();
        if empty > 0 {
            report.push_issue(format!("{} 道题目的题干为空", empty));
        }

        let short = records
            .iter()
            .filter(|r| {
                let len = r.prompt_text.trim().chars().count();
                len > 0 && len < SHORT_PROMPT_CHARS
            })
            .count();
        if short > 0 {
            report.push_warning(format!("{} 道题目的题干过短", short));
        }
    }

    /// 选择题的选项完整性
    fn check_options(&self, records: &[QuestionRecord], report: &mut ValidationReport) {
        let incomplete = records
            .iter()
            .filter(|r| r.kind == QuestionKind::MultipleChoice && !r.options.is_complete())
            .count();
        if incomplete > 0 {
            report.push_warning(format!("{} 道选择题的选项不齐全", incomplete));
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
