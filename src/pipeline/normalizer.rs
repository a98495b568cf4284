//! 文本归一化
//!
//! 负责原始抽取文字的清理：空白折叠、私用区选项字形映射、
//! 全角数字折叠。后续阶段一律假定输入已归一化，字形问题
//! 只在这一层解决一次。

use phf::phf_map;

/// 私用区字形 → 规范选项字母
///
/// 试卷嵌入字体把带圈/带框的选项字母编码进 Unicode 私用区，
/// pdftotext 原样吐出这些码位。以下是从语料中整理出的封闭集合。
static GLYPH_LETTERS: phf::Map<char, char> = phf_map! {
    // 常见嵌入字体集合一（E0 区）
    '\u{E18C}' => 'A', '\u{E18D}' => 'B', '\u{E18E}' => 'C', '\u{E18F}' => 'D',
    // 常见嵌入字体集合二（F6 区）
    '\u{F6B1}' => 'A', '\u{F6B2}' => 'B', '\u{F6B3}' => 'C', '\u{F6B4}' => 'D',
    // Unicode 带圈字母（非私用区，但出现在同类转出文本中）
    '\u{24B6}' => 'A', '\u{24B7}' => 'B', '\u{24B8}' => 'C', '\u{24B9}' => 'D',
};

/// 把任意形态的选项字母解析为规范 ASCII 字母
///
/// 接受 ASCII `A-D`、全角 `Ａ-Ｄ` 以及字形表中的私用区码位；
/// 其他字符返回 `None`。选项抽取阶段用它识别归一化后仍然
/// 残留的字形。
pub fn canonical_option_letter(c: char) -> Option<char> {
    match c {
        'A'..='D' => Some(c),
        'Ａ'..='Ｄ' => {
            // 全角字母与 ASCII 字母保持相同的偏移
            Some(char::from(b'A' + (c as u32 - 'Ａ' as u32) as u8))
        }
        _ => GLYPH_LETTERS.get(&c).copied(),
    }
}

/// 文本归一化器
///
/// 纯函数式阶段：无副作用，且幂等（归一化两次等于一次）。
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// 归一化一段原始抽取文字
    ///
    /// 1. 私用区/带圈选项字形映射为规范字母
    /// 2. 全角数字折叠为 ASCII 数字
    /// 3. 连续空白（含换行）折叠为单个空格，首尾去空白
    pub fn normalize(&self, text: &str) -> String {
        let mapped: String = text.chars().map(map_char).collect();
        mapped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn map_char(c: char) -> char {
    if let Some(&letter) = GLYPH_LETTERS.get(&c) {
        return letter;
    }
    if ('０'..='９').contains(&c) {
        return char::from(b'0' + (c as u32 - '０' as u32) as u8);
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapse() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("1  下列\n何者   正確"), "1 下列 何者 正確");
    }

    #[test]
    fn test_glyph_mapping() {
        let n = Normalizer::new();
        assert_eq!(
            n.normalize("1 \u{E18C}甲 \u{E18D}乙 \u{E18E}丙 \u{E18F}丁"),
            "1 A甲 B乙 C丙 D丁"
        );
    }

    #[test]
    fn test_circled_letters_mapped() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("Ⓐ甲 Ⓑ乙"), "A甲 B乙");
    }

    #[test]
    fn test_fullwidth_digits_folded() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("共２５題"), "共25題");
    }

    #[test]
    fn test_idempotent() {
        let n = Normalizer::new();
        let inputs = [
            "  1 \u{E18C}甲\n\n2 Ｂ乙  ",
            "共２５題",
            "",
            "已经归一化的 文本 A甲 B乙",
        ];
        for input in inputs {
            let once = n.normalize(input);
            assert_eq!(n.normalize(&once), once, "输入: {:?}", input);
        }
    }

    #[test]
    fn test_canonical_option_letter() {
        assert_eq!(canonical_option_letter('A'), Some('A'));
        assert_eq!(canonical_option_letter('Ｄ'), Some('D'));
        assert_eq!(canonical_option_letter('\u{F6B2}'), Some('B'));
        assert_eq!(canonical_option_letter('E'), None);
        assert_eq!(canonical_option_letter('某'), None);
    }
}
