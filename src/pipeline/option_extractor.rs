//! 选项抽取
//!
//! 在单个题目切块内定位四个选项标记并切出各自的文字。
//! 选项字母同时接受 ASCII `A-D`、全角 `Ａ-Ｄ`，以及归一化
//! 后仍然残留的私用区字形（同一张封闭字形表）。

use crate::models::{OptionSet, QuestionChunk, QuestionKind};
use crate::pipeline::normalizer::canonical_option_letter;
use regex::Regex;

/// 单题抽取结果
#[derive(Debug, Clone)]
pub struct ExtractedQuestion {
    /// 题干（首个选项标记之前的文字，去掉题号）
    pub prompt_text: String,
    /// 选项集合（可能不足四项，绝不伪造）
    pub options: OptionSet,
    /// 题目类型
    pub kind: QuestionKind,
    /// 四个选项是否齐全
    pub is_complete: bool,
}

/// 选项抽取器
pub struct OptionExtractor {
    leading_number: Regex,
}

struct OptionToken {
    byte_start: usize,
    byte_end: usize,
    letter: char,
}

impl OptionExtractor {
    pub fn new() -> Self {
        Self {
            // 题干开头的题号及其分隔符
            leading_number: Regex::new(r"^\s*\d+\s*[.、．)）:：]?\s*")
                .expect("内建题号正则应当有效"),
        }
    }

    /// 从切块中抽取题干与选项
    ///
    /// 切块里找不到任何选项标记时视为非选择题：
    /// 选项集合为空、`kind = FreeResponse`。
    pub fn extract(&self, chunk: &QuestionChunk) -> ExtractedQuestion {
        let text = chunk.raw_text.as_str();
        let tokens = collect_option_tokens(text);

        if tokens.is_empty() {
            return ExtractedQuestion {
                prompt_text: self.strip_leading_number(text),
                options: OptionSet::new(),
                kind: QuestionKind::FreeResponse,
                // is_complete 只对选择题有意义；非选择题没有
                // "选项齐全"的概念，恒为 true，下游校验也只对
                // MultipleChoice 检查选项完整性
                is_complete: true,
            };
        }

        let prompt_text = self.strip_leading_number(&text[..tokens[0].byte_start]);

        // 标记之间的文字即选项内容；同一字母重复出现时
        // 后者覆盖前者（靠后的文字更接近真实选项区）
        let mut options = OptionSet::new();
        for (i, token) in tokens.iter().enumerate() {
            let end = tokens
                .get(i + 1)
                .map(|next| next.byte_start)
                .unwrap_or(text.len());
            let content = trim_option_content(&text[token.byte_end..end]);
            options.insert(token.letter, content);
        }

        let is_complete = options.is_complete();
        ExtractedQuestion {
            prompt_text,
            options,
            kind: QuestionKind::MultipleChoice,
            is_complete,
        }
    }

    fn strip_leading_number(&self, text: &str) -> String {
        self.leading_number.replace(text, "").trim().to_string()
    }
}

impl Default for OptionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 按文档顺序收集全部选项标记
///
/// ASCII 字母要求两侧都不是 ASCII 字母数字（避免把英文单词
/// 里的大写字母当成选项标记）；全角与字形标记总是成立。
fn collect_option_tokens(text: &str) -> Vec<OptionToken> {
    let mut tokens = Vec::new();
    let mut prev_char: Option<char> = None;

    let mut iter = text.char_indices().peekable();
    while let Some((idx, c)) = iter.next() {
        if let Some(letter) = canonical_option_letter(c) {
            let is_ascii_token = c.is_ascii();
            let prev_ok = !is_ascii_token
                || !prev_char.is_some_and(|p| p.is_ascii_alphanumeric());
            let next_ok = !is_ascii_token
                || !iter
                    .peek()
                    .is_some_and(|(_, next)| next.is_ascii_alphanumeric());
            if prev_ok && next_ok {
                tokens.push(OptionToken {
                    byte_start: idx,
                    byte_end: idx + c.len_utf8(),
                    letter,
                });
            }
        }
        prev_char = Some(c);
    }
    tokens
}

/// 去掉选项内容两端的空白和紧跟标记的分隔符
fn trim_option_content(content: &str) -> String {
    content
        .trim()
        .trim_start_matches(['.', '．', '、', ')', '）', ':', '：'])
        .trim()
        .to_string()
}
