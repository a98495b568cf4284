use serde::{Deserialize, Serialize};

/// 原始文档
///
/// 由外部的 PDF 文字抽取协作方产出，每份 PDF 一个；
/// 抽取失败时 `full_text` 为空字符串，不是错误。
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// 文档标识（通常为试卷名称）
    pub source_id: String,
    /// 抽取出的全文文字
    pub full_text: String,
}

impl RawDocument {
    pub fn new(source_id: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            full_text: full_text.into(),
        }
    }

    /// 文字是否为空（抽取失败或空白 PDF）
    pub fn is_empty(&self) -> bool {
        self.full_text.trim().is_empty()
    }
}

/// 文档处理任务
///
/// 对应任务文件夹中的一个 TOML 清单，描述一份待重建的试卷：
/// 抽取文字文件、答案文件、更正文件与预期题数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTask {
    /// 试卷名称（同时作为输出文件名）
    pub name: String,
    /// 抽取文字文件路径
    pub paper_text: String,
    /// 答案文件路径（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    /// 答案更正文件路径（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrections_text: Option<String>,
    /// 预期题目数量（可选，缺省时从文中“共N題”推断）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_questions: Option<u32>,
    /// 清单文件自身的路径
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl DocumentTask {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}
