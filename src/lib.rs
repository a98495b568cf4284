//! # Exam Question Rebuild
//!
//! 一个从 PDF 抽取文字中重建结构化题目记录的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 领域数据结构与任务清单加载
//! - `DocumentTask` / `RawDocument` - 输入侧数据
//! - `QuestionRecord` / `PassageGroup` / `AnswerKey` - 重建产物
//! - `ValidationReport` - 校验报告
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单路输入或输出
//! - `TextSource` - 文字加载能力（缺文件降级为空串）
//! - `CacheStore` - 按内容哈希缓存重建结果
//! - `RecordSink` - 记录落盘能力
//! - `WarnWriter` - 写 warn.txt 能力
//! - `RateLimiter` - 来源访问节流能力
//!
//! ### ③ 流程层（Pipeline）
//! - `pipeline/` - 定义"一份文档"的完整重建流程
//! - `Normalizer` → `GroupDetector` → `Segmenter` → `OptionExtractor`
//! - `AnswerReconciler` - 答案合并（更正优先）
//! - `Validator` - 结构校验，产出报告
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 批量文档处理器，管理资源和并发
//! - `orchestrator/document_processor` - 单个文档处理器，缓存与落盘

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod pipeline;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    AnswerKey, DocumentTask, PassageGroup, QuestionRecord, RawDocument, ValidationReport,
    ValidationStatus,
};
pub use orchestrator::{process_document, App};
pub use pipeline::{Pipeline, PipelineOutput};
