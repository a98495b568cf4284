//! 题组侦测
//!
//! 在归一化文本中寻找"請依下文回答第 N 至 M 題"一类的标记语，
//! 并据此切出阅读题组的正文范围。多种说法等价，按固定优先级
//! 逐一尝试（命中策略记录在结果上，便于排查）。

use crate::models::PassageGroup;
use regex::Regex;
use tracing::debug;

/// 标记语策略：一种说法对应一条命名正则
struct MarkerStrategy {
    name: &'static str,
    regex: Regex,
}

/// 一次标记语命中（含字节位置，供管线切出前导区段）
#[derive(Debug, Clone)]
pub struct DetectedGroup {
    pub group: PassageGroup,
    /// 标记语在文档中的起始字节位置
    pub marker_start: usize,
    /// 正文起始字节位置（标记语之后）
    pub body_start: usize,
    /// 正文结束字节位置（下一个标记语或文末）
    pub body_end: usize,
    /// 命中的策略名
    pub strategy: &'static str,
}

struct MarkerHit {
    start: usize,
    end: usize,
    start_number: u32,
    end_number: u32,
    strategy: &'static str,
    priority: usize,
}

/// 题组侦测器
pub struct GroupDetector {
    strategies: Vec<MarkerStrategy>,
}

impl GroupDetector {
    pub fn new() -> Self {
        // 说法按语料中的出现频率排序；正则只依赖已归一化的
        // 单行文本（空白已折叠、全角数字已转半角）
        let patterns: [(&'static str, &'static str); 4] = [
            (
                "read-passage",
                r"請?閱讀下[文列]的?(?:文章|短文|選文)?[，,]?\s*並?回答第\s*(\d+)\s*[至到~－-]\s*第?\s*(\d+)\s*題",
            ),
            (
                "per-passage",
                r"請?依下[文列]回答第\s*(\d+)\s*[至到~－-]\s*第?\s*(\d+)\s*題",
            ),
            (
                "per-article",
                r"依據?下列(?:文章|短文|選文)[，,]?\s*回答第\s*(\d+)\s*[至到~－-]\s*第?\s*(\d+)\s*題",
            ),
            (
                "answer-based-on",
                r"(?i)answer questions?\s*(\d+)\s*(?:through|to|[-–])\s*(\d+)\s*based on the following (?:passage|article|excerpt)",
            ),
        ];

        let strategies = patterns
            .into_iter()
            .map(|(name, pattern)| MarkerStrategy {
                name,
                regex: Regex::new(pattern).expect("内建标记语正则应当有效"),
            })
            .collect();

        Self { strategies }
    }

    /// 侦测全部题组
    ///
    /// 返回按文档位置排序的题组列表和过程警告。零标记语是
    /// 合法情形（全卷无阅读题组），返回空列表。
    pub fn detect(&self, text: &str) -> (Vec<DetectedGroup>, Vec<String>) {
        let mut hits: Vec<MarkerHit> = Vec::new();

        for (priority, strategy) in self.strategies.iter().enumerate() {
            for caps in strategy.regex.captures_iter(text) {
                let whole = caps.get(0).expect("捕获组0总是存在");
                let (Some(start_number), Some(end_number)) =
                    (parse_capture(&caps, 1), parse_capture(&caps, 2))
                else {
                    continue;
                };
                hits.push(MarkerHit {
                    start: whole.start(),
                    end: whole.end(),
                    start_number,
                    end_number,
                    strategy: strategy.name,
                    priority,
                });
            }
        }

        // 按位置排序；同一区域被多条策略命中时保留优先级高的
        hits.sort_by_key(|h| (h.start, h.priority));
        let mut kept: Vec<MarkerHit> = Vec::new();
        for hit in hits {
            match kept.last() {
                Some(prev) if hit.start < prev.end => continue,
                _ => kept.push(hit),
            }
        }

        // 正文范围：标记语末尾到下一个标记语（任意说法）或文末。
        // 后出现的标记语永远终止前一个题组的正文。
        let mut warnings = Vec::new();
        let mut groups = Vec::new();
        for (i, hit) in kept.iter().enumerate() {
            let body_end = kept.get(i + 1).map(|next| next.start).unwrap_or(text.len());

            if hit.end_number < hit.start_number {
                // 异常区间：丢弃该题组，但它的标记语仍然参与
                // 前一个题组的正文终止
                warnings.push(format!(
                    "题组区间异常（第{}至{}題），已丢弃",
                    hit.start_number, hit.end_number
                ));
                continue;
            }

            debug!(
                "题组命中: 第{}至{}題 (策略 {})",
                hit.start_number, hit.end_number, hit.strategy
            );

            groups.push(DetectedGroup {
                group: PassageGroup {
                    start_number: hit.start_number,
                    end_number: hit.end_number,
                    body_text: text[hit.end..body_end].trim().to_string(),
                },
                marker_start: hit.start,
                body_start: hit.end,
                body_end,
                strategy: hit.strategy,
            });
        }

        (groups, warnings)
    }
}

impl Default for GroupDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_capture(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_markers_yields_zero_groups() {
        let detector = GroupDetector::new();
        let (groups, warnings) = detector.detect("1 下列何者正確 A甲 B乙 C丙 D丁");
        assert!(groups.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_single_group_runs_to_end() {
        let detector = GroupDetector::new();
        let text = "請依下文回答第3至5題 某段文章。 3 A甲 B乙 4 A丙 B丁";
        let (groups, _) = detector.detect(text);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group.start_number, 3);
        assert_eq!(groups[0].group.end_number, 5);
        assert!(groups[0].group.body_text.starts_with("某段文章"));
        assert_eq!(groups[0].body_end, text.len());
    }

    #[test]
    fn test_later_marker_terminates_previous_body() {
        let detector = GroupDetector::new();
        let text = "請依下文回答第1至2題 文章甲 閱讀下文，回答第3至4題 文章乙";
        let (groups, _) = detector.detect(text);
        assert_eq!(groups.len(), 2);
        // 题组按文档位置有序，且前一个正文不越过后一个标记语
        assert!(groups[0].body_end <= groups[1].marker_start);
        assert_eq!(groups[0].group.body_text, "文章甲");
        assert_eq!(groups[1].group.body_text, "文章乙");
    }

    #[test]
    fn test_equivalent_phrasings_recognized() {
        let detector = GroupDetector::new();
        for text in [
            "請依下文回答第6至10題 正文",
            "閱讀下文，回答第6至10題 正文",
            "依下列短文回答第6至10題 正文",
            "請閱讀下文並回答第6到10題 正文",
            "Answer questions 6 through 10 based on the following passage. 正文",
        ] {
            let (groups, _) = detector.detect(text);
            assert_eq!(groups.len(), 1, "未识别: {}", text);
            assert_eq!(groups[0].group.start_number, 6);
            assert_eq!(groups[0].group.end_number, 10);
        }
    }

    #[test]
    fn test_malformed_range_discarded_with_warning() {
        let detector = GroupDetector::new();
        let text = "請依下文回答第8至3題 异常文章 請依下文回答第9至10題 正常文章";
        let (groups, warnings) = detector.detect(text);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group.start_number, 9);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("第8至3題"));
    }

    #[test]
    fn test_fullwidth_digits_after_normalization() {
        use crate::pipeline::normalizer::Normalizer;
        let detector = GroupDetector::new();
        let text = Normalizer::new().normalize("請依下文回答第１１至１５題 正文");
        let (groups, _) = detector.detect(&text);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group.start_number, 11);
        assert_eq!(groups[0].group.end_number, 15);
    }
}
