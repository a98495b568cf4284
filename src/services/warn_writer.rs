//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力：把校验报告里的问题与警告逐条
//! 追加到警告文件，供人工复核。不关心流程顺序。

use crate::error::{AppError, AppResult};
use crate::models::ValidationReport;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 警告写入服务
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 创建新的警告写入服务
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入一份文档的全部校验问题
    ///
    /// # 参数
    /// - `source_id`: 文档标识
    /// - `report`: 校验报告
    pub fn write(&self, source_id: &str, report: &ValidationReport) -> AppResult<()> {
        debug!(
            "写入警告: {} | 问题 {} | 警告 {}",
            source_id,
            report.issues.len(),
            report.warnings.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .map_err(|e| AppError::FileWrite {
                path: self.warn_file_path.clone(),
                source: e,
            })?;

        let mut lines = String::new();
        for issue in &report.issues {
            lines.push_str(&format!("文档 {} | 问题 | {}\n", source_id, issue));
        }
        for warning in &report.warnings {
            lines.push_str(&format!("文档 {} | 警告 | {}\n", source_id, warning));
        }

        file.write_all(lines.as_bytes())
            .map_err(|e| AppError::FileWrite {
                path: self.warn_file_path.clone(),
                source: e,
            })?;

        Ok(())
    }
}

impl Default for WarnWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issues_and_warnings_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warn.txt");
        let writer = WarnWriter::with_path(path.to_string_lossy().to_string());

        let mut report = ValidationReport::new();
        report.push_issue("题号重复: 3");
        report.push_warning("题号序列存在缺口: 5-7");

        writer.write("某试卷", &report).unwrap();
        writer.write("另一试卷", &report).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(content.contains("某试卷 | 问题 | 题号重复: 3"));
        assert!(content.contains("另一试卷 | 警告 | 题号序列存在缺口: 5-7"));
    }
}
