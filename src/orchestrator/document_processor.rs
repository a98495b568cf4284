//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个文档的完整重建流程，是文档级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **节流**：读取外部文字来源前先经过 RateLimiter
//! 2. **文字加载**：读取试卷全文、答案、更正三路文字
//! 3. **缓存probe**：按内容哈希查缓存，命中则跳过重建只做复验
//! 4. **管线调度**：未命中时运行完整重建管线
//! 5. **结果落盘**：记录写入 JSON 输出，非 Success 的报告写入 warn 文件
//! 6. **统计输出**：记录单个文档的处理结果

use crate::config::Config;
use crate::models::{DocumentTask, RawDocument};
use crate::pipeline::{Pipeline, Validator};
use crate::services::{
    content_hash, CacheStore, FileTextSource, JsonFileCache, JsonFileSink, RateLimiter,
    RecordSink, TextSource, WarnWriter,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// 处理单个文档
///
/// # 参数
/// - `task`: 文档任务清单
/// - `doc_index`: 文档索引（用于日志）
/// - `config`: 配置
/// - `limiter`: 共享的来源访问节流器
///
/// # 返回
/// 返回是否成功重建（报告非 Error 即视为成功）
pub async fn process_document(
    task: DocumentTask,
    doc_index: usize,
    config: &Config,
    limiter: Arc<RateLimiter>,
) -> Result<bool> {
    info!("[文档 {}] 📖 开始处理: {}", doc_index, task.name);

    // 读取外部文字来源前先节流
    limiter.acquire().await;

    let source = FileTextSource::new();
    let full_text = source.load_text(&task.paper_text);
    let answer_text = source.load_optional(task.answer_text.as_deref());
    let corrections_text = source.load_optional(task.corrections_text.as_deref());

    if full_text.is_empty() {
        warn!("[文档 {}] ⚠️ 试卷文字为空: {}", doc_index, task.paper_text);
    }

    // 缓存键覆盖三路输入，任一变化都会失效
    let cache_key = content_hash(&format!(
        "{}\u{1}{}\u{1}{}",
        full_text,
        answer_text.as_deref().unwrap_or(""),
        corrections_text.as_deref().unwrap_or("")
    ));
    let cache = JsonFileCache::new(&config.cache_folder, config.cache_freshness_days)?;

    let (records, report) = match cache.get(&cache_key) {
        Ok(Some(cached)) => {
            info!("[文档 {}] ⚡ 缓存命中（{} 条记录），仅复验", doc_index, cached.len());
            let report = Validator::new().validate(&cached, task.expected_questions);
            (cached, report)
        }
        Ok(None) => {
            let doc = RawDocument::new(task.name.clone(), full_text);
            let output = Pipeline::new().run(
                &doc,
                answer_text.as_deref(),
                corrections_text.as_deref(),
                task.expected_questions,
            );
            if !output.records.is_empty() && !output.report.is_error() {
                if let Err(e) = cache.put(&cache_key, &output.records) {
                    warn!("[文档 {}] ⚠️ 缓存写入失败: {}", doc_index, e);
                }
            }
            (output.records, output.report)
        }
        Err(e) => {
            // 缓存损坏不阻断重建
            warn!("[文档 {}] ⚠️ 缓存读取失败，忽略缓存: {}", doc_index, e);
            let doc = RawDocument::new(task.name.clone(), full_text);
            let output = Pipeline::new().run(
                &doc,
                answer_text.as_deref(),
                corrections_text.as_deref(),
                task.expected_questions,
            );
            (output.records, output.report)
        }
    };

    // 落盘
    let sink = JsonFileSink::new(&config.output_folder)?;
    sink.write(&task.name, &records, &report)?;

    if !report.is_success() {
        let warn_writer = WarnWriter::with_path(config.warn_file.clone());
        if let Err(e) = warn_writer.write(&task.name, &report) {
            warn!("[文档 {}] ⚠️ 警告文件写入失败: {}", doc_index, e);
        }
    }

    info!(
        "[文档 {}] ✓ 完成: {} 条记录, 状态 {:?}, 问题 {}, 警告 {}",
        doc_index,
        records.len(),
        report.status,
        report.issues.len(),
        report.warnings.len()
    );

    Ok(!report.is_error())
}
