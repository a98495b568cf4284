//! 记录落盘服务 - 业务能力层
//!
//! 把一次文档运行的记录与报告整体写出。持久化格式属于
//! 协作方职责，这里提供 JSON 参考实现，保证 题号 / 最终
//! 答案 / 选项内容 在写出-读回后完全一致。

use crate::error::{AppError, AppResult};
use crate::models::{QuestionRecord, ValidationReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 记录落盘接口
pub trait RecordSink {
    /// 写出一份文档的全部记录与校验报告
    fn write(
        &self,
        source_id: &str,
        records: &[QuestionRecord],
        report: &ValidationReport,
    ) -> AppResult<()>;
}

/// 落盘文件的整体结构
#[derive(Debug, Serialize, Deserialize)]
pub struct SinkDocument {
    pub source_id: String,
    pub records: Vec<QuestionRecord>,
    pub report: ValidationReport,
}

/// JSON 文件落盘
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| AppError::FileWrite {
            path: dir.display().to_string(),
            source: e,
        })?;
        Ok(Self { dir })
    }

    /// 读回一个落盘文件（供下游消费方与往返测试使用）
    pub fn read(path: &Path) -> AppResult<SinkDocument> {
        let content = fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn output_path(&self, source_id: &str) -> PathBuf {
        // 文件名里的路径分隔符替换掉，防止逃出输出目录
        let safe: String = source_id
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl RecordSink for JsonFileSink {
    fn write(
        &self,
        source_id: &str,
        records: &[QuestionRecord],
        report: &ValidationReport,
    ) -> AppResult<()> {
        let doc = SinkDocument {
            source_id: source_id.to_string(),
            records: records.to_vec(),
            report: report.clone(),
        };
        let path = self.output_path(source_id);
        let content = serde_json::to_string_pretty(&doc)?;
        fs::write(&path, content).map_err(|e| AppError::FileWrite {
            path: path.display().to_string(),
            source: e,
        })?;
        info!("✓ 记录已写出: {}", path.display());
        Ok(())
    }
}
