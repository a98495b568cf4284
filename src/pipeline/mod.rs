//! 题目重建管线
//!
//! 核心数据流（单向，逐阶段全量交接，无流式重叠）：
//!
//! ```text
//! Normalizer → GroupDetector → Segmenter → OptionExtractor
//!                                    ↑
//!                 AnswerReconciler ──┘（合并答案）
//!                          ↓
//!                      Validator → 记录 + 报告
//! ```
//!
//! 状态机：Start → Normalized → Segmented → OptionsExtracted →
//! AnswersMerged → Validated → Done。数据质量问题从不抛错：
//! 空文本、零锚点等情形都照常走到 Validated，由报告说话。

pub mod answer_reconciler;
pub mod group_detector;
pub mod normalizer;
pub mod option_extractor;
pub mod segmenter;
pub mod validator;

pub use answer_reconciler::AnswerReconciler;
pub use group_detector::{DetectedGroup, GroupDetector};
pub use normalizer::Normalizer;
pub use option_extractor::{ExtractedQuestion, OptionExtractor};
pub use segmenter::Segmenter;
pub use validator::{Validator, ISSUE_NO_QUESTIONS};

use crate::models::{
    PassageGroup, QuestionChunk, QuestionRecord, RawDocument, ValidationReport,
};
use regex::Regex;
use tracing::debug;

/// 预期题数缺失时的扫描上限
const MAX_SCAN_QUESTIONS: u32 = 100;

/// 单次文档运行的产出
#[derive(Debug)]
pub struct PipelineOutput {
    /// 重建出的题目记录（按题号有序）
    pub records: Vec<QuestionRecord>,
    /// 校验报告
    pub report: ValidationReport,
    /// 侦测到的阅读题组
    pub groups: Vec<PassageGroup>,
    /// 已完成的阶段（调试用）
    pub stages: Vec<&'static str>,
}

/// 题目重建管线
///
/// 每次文档处理运行构造一个实例即可；内部各阶段均为
/// 纯转换，无共享可变状态，多个实例可以并行使用。
pub struct Pipeline {
    normalizer: Normalizer,
    group_detector: GroupDetector,
    segmenter: Segmenter,
    option_extractor: OptionExtractor,
    answer_reconciler: AnswerReconciler,
    validator: Validator,
    declared_total: Regex,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::new(),
            group_detector: GroupDetector::new(),
            segmenter: Segmenter::new(),
            option_extractor: OptionExtractor::new(),
            answer_reconciler: AnswerReconciler::new(),
            validator: Validator::new(),
            declared_total: Regex::new(r"共\s*(\d+)\s*題").expect("内建题数正则应当有效"),
        }
    }

    /// 处理一份文档
    ///
    /// # 参数
    /// - `doc`: 原始文档（空文本合法，产出 Error 报告而非崩溃）
    /// - `answer_text`: 答案文档全文（可缺）
    /// - `corrections_text`: 更正文档全文（可缺）
    /// - `expected_questions`: 清单声明的预期题数（可缺，
    ///   缺省时尝试从文中"共N題"推断）
    pub fn run(
        &self,
        doc: &RawDocument,
        answer_text: Option<&str>,
        corrections_text: Option<&str>,
        expected_questions: Option<u32>,
    ) -> PipelineOutput {
        let mut stages = Vec::with_capacity(6);
        let mut stage_warnings: Vec<String> = Vec::new();

        // --- Normalized ---
        let normalized = self.normalizer.normalize(&doc.full_text);
        stages.push("normalized");
        debug!("[{}] 归一化完成，{} 字符", doc.source_id, normalized.chars().count());

        let expected = expected_questions.or_else(|| self.detect_declared_total(&normalized));
        let total = expected.unwrap_or(MAX_SCAN_QUESTIONS);

        // --- Segmented（含题组侦测）---
        let (detected, group_warnings) = self.group_detector.detect(&normalized);
        stage_warnings.extend(group_warnings);

        let (mut chunks, group_stems) = self.segment_document(&normalized, &detected, total);
        if expected.is_none() {
            // 扫描上限只是探测范围，尾部的未找到占位块不算缺口
            while chunks.last().is_some_and(|c| !c.found) {
                chunks.pop();
            }
        }
        stages.push("segmented");
        debug!(
            "[{}] 切分完成: {} 块，其中 {} 块未找到锚点",
            doc.source_id,
            chunks.len(),
            chunks.iter().filter(|c| !c.found).count()
        );

        // --- OptionsExtracted ---
        let not_found = chunks.iter().filter(|c| !c.found).count();
        let mut records: Vec<QuestionRecord> = chunks
            .iter()
            .filter(|c| c.found)
            .map(|chunk| {
                let q = self.option_extractor.extract(chunk);
                // 题组内的克漏字题自身往往没有题干，共享的
                // 文章段落就是它们的题干
                let prompt_text = if q.prompt_text.is_empty() {
                    chunk
                        .group_ref
                        .and_then(|i| group_stems.get(i).cloned())
                        .unwrap_or(q.prompt_text)
                } else {
                    q.prompt_text
                };
                QuestionRecord {
                    number: chunk.number,
                    prompt_text,
                    options: q.options,
                    kind: q.kind,
                    is_complete: q.is_complete,
                    correct_answer: None,
                    corrected_answer: None,
                }
            })
            .collect();
        stages.push("options_extracted");

        // --- AnswersMerged ---
        let key = self.answer_reconciler.reconcile(answer_text, corrections_text);
        stage_warnings.extend(key.warnings.iter().cloned());
        for record in &mut records {
            record.correct_answer = key.primary.get(&record.number).copied();
            record.corrected_answer = key.corrections.get(&record.number).copied();
        }
        stages.push("answers_merged");

        // --- Validated ---
        let mut report = self.validator.validate(&records, expected);
        for warning in stage_warnings {
            report.push_warning(warning);
        }
        report.set_metric("passage_groups", detected.len());
        report.set_metric("chunks_not_found", not_found);
        stages.push("validated");
        stages.push("done");

        PipelineOutput {
            records,
            report,
            groups: detected.into_iter().map(|d| d.group).collect(),
            stages,
        }
    }

    /// 从文中"共N題"声明推断预期题数
    fn detect_declared_total(&self, text: &str) -> Option<u32> {
        self.declared_total
            .captures(text)
            .and_then(|caps| caps.get(1)?.as_str().parse().ok())
    }

    /// 按题组规划切分范围
    ///
    /// 题组正文一直延伸到下一个标记语，题组之后的散题在
    /// 物理上就落在前一个题组的正文里，所以每个正文都按
    /// "本组起始题号 → 下一组起始题号之前"的扩展区间切分，
    /// 仅把声明区间内的题号标记为题组成员。
    fn segment_document(
        &self,
        normalized: &str,
        detected: &[DetectedGroup],
        total: u32,
    ) -> (Vec<QuestionChunk>, Vec<String>) {
        if detected.is_empty() {
            return (self.segmenter.segment(normalized, 1..=total), Vec::new());
        }

        let mut chunks = Vec::new();
        let mut group_stems = Vec::with_capacity(detected.len());

        // 第一个标记语之前的散题
        let first = &detected[0];
        if first.group.start_number > 1 {
            let leading = &normalized[..first.marker_start];
            chunks.extend(
                self.segmenter
                    .segment(leading, 1..=first.group.start_number - 1),
            );
        }

        for (i, d) in detected.iter().enumerate() {
            let ext_end = detected
                .get(i + 1)
                .map(|next| next.group.start_number.saturating_sub(1))
                .unwrap_or(total)
                .max(d.group.end_number);

            let body = &normalized[d.body_start..d.body_end];
            let mut group_chunks = self
                .segmenter
                .segment(body, d.group.start_number..=ext_end);

            // 共享题干 = 正文开头到第一个题目锚点之前的段落
            let stem = group_chunks
                .iter()
                .find(|c| c.found)
                .map(|c| body[..c.offset].trim().to_string())
                .unwrap_or_default();
            group_stems.push(stem);

            for chunk in &mut group_chunks {
                if d.group.contains(chunk.number) {
                    chunk.is_grouped = true;
                    chunk.group_ref = Some(i);
                }
            }
            chunks.extend(group_chunks);
        }

        (chunks, group_stems)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuestionKind, ValidationStatus};

    fn doc(text: &str) -> RawDocument {
        RawDocument::new("测试卷", text)
    }

    #[test]
    fn test_empty_text_reaches_validated_with_error() {
        let pipeline = Pipeline::new();
        let out = pipeline.run(&doc(""), None, None, None);
        assert!(out.records.is_empty());
        assert_eq!(out.report.status, ValidationStatus::Error);
        assert_eq!(out.report.issues, vec![ISSUE_NO_QUESTIONS.to_string()]);
        assert_eq!(out.stages.last(), Some(&"done"));
    }

    #[test]
    fn test_plain_paper_without_groups() {
        let pipeline = Pipeline::new();
        let text = "本卷共2題 1 下列敘述何者正確 A甲1 B甲2 C甲3 D甲4 2 下列何者有誤 A乙1 B乙2 C乙3 D乙4";
        let out = pipeline.run(&doc(text), None, None, None);
        assert!(out.groups.is_empty());
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.report.status, ValidationStatus::Success);
        assert_eq!(out.records[0].prompt_text, "下列敘述何者正確");
        assert_eq!(out.records[1].options.get('C'), Some("乙3"));
    }

    #[test]
    fn test_declared_total_probed_from_text() {
        let pipeline = Pipeline::new();
        // 共3題但只找得到 2 题 → 数量偏差警告 + 缺口可见
        let text = "本卷共3題 1 下列敘述何者正確 A甲 B乙 C丙 D丁 3 下列敘述何者有誤 A甲 B乙 C丙 D丁";
        let out = pipeline.run(&doc(text), None, None, None);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.report.summary["expected_questions"], 3);
        assert_eq!(out.report.status, ValidationStatus::Warning);
        assert!(out.report.warnings.iter().any(|w| w.contains("缺口")));
    }

    #[test]
    fn test_passage_group_flow() {
        let pipeline = Pipeline::new();
        let text = "共4題 1 下列敘述何者正確 A甲 B乙 C丙 D丁 \
                    請依下文回答第2至3題 某段文章內容如下 \
                    2 A甲 B乙 C丙 D丁 3 A甲 B乙 C丙 D丁 \
                    4 依上文下列何者有誤 A甲 B乙 C丙 D丁";
        let out = pipeline.run(&doc(text), None, None, None);
        assert_eq!(out.groups.len(), 1);
        assert_eq!(out.records.len(), 4);
        assert_eq!(out.report.status, ValidationStatus::Success);
        // 题组正文延伸到文末，第4题在其中但不属于题组
        let grouped: Vec<u32> = out
            .records
            .iter()
            .filter(|r| r.number == 2 || r.number == 3)
            .map(|r| r.number)
            .collect();
        assert_eq!(grouped, vec![2, 3]);
    }

    #[test]
    fn test_answers_merged_into_records() {
        let pipeline = Pipeline::new();
        let text = "共2題 1 下列敘述何者正確 A甲 B乙 C丙 D丁 2 下列何者有誤 A甲 B乙 C丙 D丁";
        let out = pipeline.run(
            &doc(text),
            Some("1.A 2.C"),
            Some("第1題答案更正為D"),
            None,
        );
        assert_eq!(out.records[0].correct_answer, Some('A'));
        assert_eq!(out.records[0].corrected_answer, Some('D'));
        assert_eq!(out.records[0].final_answer(), Some('D'));
        assert_eq!(out.records[1].final_answer(), Some('C'));
    }

    #[test]
    fn test_free_response_question() {
        let pipeline = Pipeline::new();
        let text = "共2題 1 下列敘述何者正確 A甲 B乙 C丙 D丁 2 請就上述議題申論之。";
        let out = pipeline.run(&doc(text), None, None, None);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[1].kind, QuestionKind::FreeResponse);
        assert!(out.records[1].options.is_empty());
    }

    #[test]
    fn test_group_warning_propagates_to_report() {
        let pipeline = Pipeline::new();
        let text = "共1題 請依下文回答第9至2題 異常段落 1 下列敘述何者正確 A甲 B乙 C丙 D丁";
        let out = pipeline.run(&doc(text), None, None, None);
        assert!(out
            .report
            .warnings
            .iter()
            .any(|w| w.contains("题组区间异常")));
    }

    #[test]
    fn test_no_expected_count_trims_trailing_placeholders() {
        let pipeline = Pipeline::new();
        let text = "1 下列敘述何者正確 A甲 B乙 C丙 D丁 2 下列何者有誤 A甲 B乙 C丙 D丁";
        let out = pipeline.run(&doc(text), None, None, None);
        // 扫描上限不会制造幻影缺口
        assert_eq!(out.records.len(), 2);
        assert!(!out.report.warnings.iter().any(|w| w.contains("缺口")));
    }
}
