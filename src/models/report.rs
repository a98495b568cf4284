use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 校验状态
///
/// 优先级 Error > Warning > Success：一旦出现问题（issue），
/// 后续的警告不会把状态拉回 Warning。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationStatus {
    Success,
    Warning,
    Error,
}

/// 校验报告
///
/// 每次运行新建一份；校验完成后不再变更。报告只做描述，
/// 从不修改输入的题目记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    /// 问题列表（按检查顺序）
    pub issues: Vec<String>,
    /// 警告列表（按检查顺序）
    pub warnings: Vec<String>,
    /// 统计指标：指标名 → 值
    pub summary: BTreeMap<String, serde_json::Value>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            status: ValidationStatus::Success,
            issues: Vec::new(),
            warnings: Vec::new(),
            summary: BTreeMap::new(),
        }
    }

    /// 记录一个问题，状态升级为 Error
    pub fn push_issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
        self.status = ValidationStatus::Error;
    }

    /// 记录一个警告；不会覆盖已有的 Error 状态
    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
        if self.status != ValidationStatus::Error {
            self.status = ValidationStatus::Warning;
        }
    }

    /// 写入统计指标
    pub fn set_metric(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.summary.insert(name.into(), value.into());
    }

    pub fn is_error(&self) -> bool {
        self.status == ValidationStatus::Error
    }

    pub fn is_success(&self) -> bool {
        self.status == ValidationStatus::Success
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} (问题 {} / 警告 {})",
            self.status,
            self.issues.len(),
            self.warnings.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_precedence() {
        let mut report = ValidationReport::new();
        assert_eq!(report.status, ValidationStatus::Success);

        report.push_warning("某个警告");
        assert_eq!(report.status, ValidationStatus::Warning);

        report.push_issue("某个问题");
        assert_eq!(report.status, ValidationStatus::Error);

        // Error 不被后续警告覆盖
        report.push_warning("又一个警告");
        assert_eq!(report.status, ValidationStatus::Error);
    }

    #[test]
    fn test_metrics() {
        let mut report = ValidationReport::new();
        report.set_metric("total_records", 25);
        assert_eq!(report.summary["total_records"], 25);
        assert!(report.is_success());
    }
}
