//! 文字来源服务 - 业务能力层
//!
//! 管线消费的是外部抽取协作方产出的纯文字文件。读取失败
//! （文件缺失、编码损坏）按约定折叠为空字符串：空输入是
//! 管线的合法情形（产出 Error 报告），不是崩溃理由。

use std::fs;
use std::path::Path;
use tracing::warn;

/// 文字来源
pub trait TextSource {
    /// 读取指定路径的抽取文字；失败时返回空字符串
    fn load_text(&self, path: &str) -> String;

    /// 读取可选路径；`None` 表示来源本身缺失（合法）
    fn load_optional(&self, path: Option<&str>) -> Option<String> {
        path.map(|p| self.load_text(p))
    }
}

/// 文件文字来源
pub struct FileTextSource;

impl FileTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for FileTextSource {
    fn load_text(&self, path: &str) -> String {
        if !Path::new(path).exists() {
            warn!("⚠️ 文字文件不存在: {}", path);
            return String::new();
        }
        match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("⚠️ 读取文字文件失败 {}: {}", path, e);
                String::new()
            }
        }
    }
}
