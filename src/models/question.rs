use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 选项字母的规范集合
pub const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// 阅读题组
///
/// 一段共享题干（文章/短文）所覆盖的连续题号区间。
/// 由 Group Detector 按文档顺序构造，区间互不重叠，
/// 且保证 `end_number >= start_number`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageGroup {
    /// 起始题号
    pub start_number: u32,
    /// 结束题号
    pub end_number: u32,
    /// 题组正文（从标记语之后到下一个标记语或文末）
    pub body_text: String,
}

impl PassageGroup {
    /// 题号是否落在本题组区间内
    pub fn contains(&self, number: u32) -> bool {
        (self.start_number..=self.end_number).contains(&number)
    }
}

/// 题目切块
///
/// 切分阶段的产物：每个题号一块。锚点找不到时仍会产出
/// `found == false` 的占位块，缺号必须显式可见，
/// 下游的校验报告依赖这一点。
#[derive(Debug, Clone)]
pub struct QuestionChunk {
    /// 题号
    pub number: u32,
    /// 该题的原始文字（含题号本身）
    pub raw_text: String,
    /// 锚点在所属片段内的字节偏移（未找到时为 0）
    pub offset: usize,
    /// 是否找到锚点
    pub found: bool,
    /// 是否属于阅读题组
    pub is_grouped: bool,
    /// 所属题组的索引（按文档顺序）
    pub group_ref: Option<usize>,
    /// 命中的锚点策略名（用于排查切分问题）
    pub strategy: Option<&'static str>,
}

impl QuestionChunk {
    /// 构造"未找到"占位块
    pub fn not_found(number: u32) -> Self {
        Self {
            number,
            raw_text: String::new(),
            offset: 0,
            found: false,
            is_grouped: false,
            group_ref: None,
            strategy: None,
        }
    }
}

/// 选项集合
///
/// 规范字母 A-D 到选项文字的有序映射。允许不足四项的
/// 部分集合（由记录上的 `is_complete` 标记），但绝不伪造
/// 占位文字。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSet {
    entries: BTreeMap<char, String>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一个选项；同一字母重复出现时后者覆盖前者
    pub fn insert(&mut self, letter: char, text: String) {
        self.entries.insert(letter, text);
    }

    pub fn get(&self, letter: char) -> Option<&str> {
        self.entries.get(&letter).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 四个字母是否齐全
    pub fn is_complete(&self) -> bool {
        OPTION_LETTERS.iter().all(|l| self.entries.contains_key(l))
    }

    /// 缺失的字母
    pub fn missing_letters(&self) -> Vec<char> {
        OPTION_LETTERS
            .iter()
            .copied()
            .filter(|l| !self.entries.contains_key(l))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&char, &String)> {
        self.entries.iter()
    }
}

/// 题目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// 选择题
    MultipleChoice,
    /// 非选择题（填空、问答等，无选项标记）
    FreeResponse,
}

/// 题目记录
///
/// 管线的最终产物单位，由单次文档处理运行独占，
/// 不存在共享可变状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// 题号
    pub number: u32,
    /// 题干文字
    pub prompt_text: String,
    /// 选项集合（非选择题为空）
    pub options: OptionSet,
    /// 题目类型
    pub kind: QuestionKind,
    /// 选项是否齐全
    pub is_complete: bool,
    /// 原始公布答案
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<char>,
    /// 事后更正答案
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_answer: Option<char>,
}

impl QuestionRecord {
    /// 最终答案：有更正取更正，否则取原始答案
    pub fn final_answer(&self) -> Option<char> {
        self.corrected_answer.or(self.correct_answer)
    }
}

impl std::fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = if self.prompt_text.chars().count() > 40 {
            self.prompt_text.chars().take(40).collect::<String>() + "..."
        } else {
            self.prompt_text.clone()
        };
        write!(
            f,
            "第{}題 [{}选项] {}",
            self.number,
            self.options.len(),
            preview
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_set_complete() {
        let mut set = OptionSet::new();
        for l in OPTION_LETTERS {
            set.insert(l, format!("选项{}", l));
        }
        assert!(set.is_complete());
        assert!(set.missing_letters().is_empty());
    }

    #[test]
    fn test_option_set_partial() {
        let mut set = OptionSet::new();
        set.insert('A', "甲".to_string());
        set.insert('C', "丙".to_string());
        assert!(!set.is_complete());
        assert_eq!(set.missing_letters(), vec!['B', 'D']);
    }

    #[test]
    fn test_option_set_duplicate_letter_keeps_later() {
        let mut set = OptionSet::new();
        set.insert('A', "噪声".to_string());
        set.insert('A', "真正的选项".to_string());
        assert_eq!(set.get('A'), Some("真正的选项"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_final_answer_prefers_correction() {
        let record = QuestionRecord {
            number: 1,
            prompt_text: "题干".to_string(),
            options: OptionSet::new(),
            kind: QuestionKind::MultipleChoice,
            is_complete: false,
            correct_answer: Some('A'),
            corrected_answer: Some('B'),
        };
        assert_eq!(record.final_answer(), Some('B'));
    }

    #[test]
    fn test_final_answer_absent() {
        let record = QuestionRecord {
            number: 2,
            prompt_text: "题干".to_string(),
            options: OptionSet::new(),
            kind: QuestionKind::FreeResponse,
            is_complete: true,
            correct_answer: None,
            corrected_answer: None,
        };
        assert_eq!(record.final_answer(), None);
    }
}
