//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、准备输出目录
//! 2. **批量加载**：扫描并加载所有待处理的任务清单（`Vec<DocumentTask>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将文档分批次处理，每批完成后再开始下一批
//! 5. **资源管理**：持有共享的 RateLimiter，确保生命周期正确
//! 6. **全局统计**：汇总所有文档的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的细节
//! - **并发安全**：通过 Semaphore 和 tokio::spawn 实现并发
//! - **向下委托**：委托 document_processor 处理单个文档

use crate::config::Config;
use crate::models::DocumentTask;
use crate::orchestrator::document_processor;
use crate::services::RateLimiter;
use crate::utils::logging;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    limiter: Arc<RateLimiter>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(config.max_concurrent_documents);

        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
            config.min_source_interval_ms,
        )));

        Ok(Self { config, limiter })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载所有待处理的任务
        let all_tasks = self.load_tasks().await?;

        if all_tasks.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(());
        }

        let total_tasks = all_tasks.len();
        logging::log_tasks_loaded(total_tasks, self.config.max_concurrent_documents);

        // 处理所有文档
        let stats = self.process_all_documents(all_tasks).await?;

        // 输出最终统计
        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 加载任务清单
    async fn load_tasks(&self) -> Result<Vec<DocumentTask>> {
        info!("\n📁 正在扫描待处理的任务清单...");
        crate::models::load_all_toml_files(&self.config.task_folder).await
    }

    /// 处理所有文档
    async fn process_all_documents(&self, all_tasks: Vec<DocumentTask>) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_documents));
        let total_tasks = all_tasks.len();
        let mut stats = ProcessingStats {
            total: total_tasks,
            ..Default::default()
        };

        // 分批处理
        for batch_start in (0..total_tasks).step_by(self.config.max_concurrent_documents) {
            let batch_end = (batch_start + self.config.max_concurrent_documents).min(total_tasks);
            let batch_tasks = &all_tasks[batch_start..batch_end];
            let batch_num = (batch_start / self.config.max_concurrent_documents) + 1;
            let total_batches = (total_tasks + self.config.max_concurrent_documents - 1)
                / self.config.max_concurrent_documents;

            logging::log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_end,
                total_tasks,
            );

            // 处理本批
            let batch_result = self
                .process_batch(batch_tasks, batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;

            logging::log_batch_complete(
                batch_num,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_tasks: &[DocumentTask],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::new();

        // 为本批创建并发任务
        for (idx, task) in batch_tasks.iter().enumerate() {
            let doc_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let task_clone = task.clone();
            let config_clone = self.config.clone();
            let limiter = self.limiter.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match document_processor::process_document(
                    task_clone,
                    doc_index,
                    &config_clone,
                    limiter,
                )
                .await
                {
                    Ok(true) => Ok(true),
                    Ok(false) => Ok(false),
                    Err(e) => {
                        error!("[文档 {}] ❌ 处理过程中发生错误: {}", doc_index, e);
                        Err(e)
                    }
                }
            });
            batch_handles.push((doc_index, handle));
        }

        // 等待本批所有任务完成
        let mut result = BatchResult::default();

        for (doc_index, handle) in batch_handles {
            match handle.await {
                Ok(Ok(true)) => {
                    result.success += 1;
                }
                Ok(Ok(false)) | Ok(Err(_)) => {
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", doc_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
}
