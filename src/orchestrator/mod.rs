//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行、清理）
//! - 批量加载任务清单（Vec<DocumentTask>）
//! - 控制并发数量（Semaphore）
//! - 持有共享节流器（RateLimiter）
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 加载单个文档的三路文字（试卷、答案、更正）
//! - 按内容哈希查缓存，命中则只做复验
//! - 调度重建管线
//! - 记录落盘与警告输出
//! - 输出单个文档的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (处理 Vec<DocumentTask>)
//!     ↓
//! document_processor (处理单个 DocumentTask)
//!     ↓
//! pipeline (重建流程：normalize → segment → extract → merge → validate)
//!     ↓
//! services (能力层：text_source / cache / sink / warn / limiter)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：app 管批量，document_processor 管单个
//! 2. **并发隔离**：只有编排层持有 Semaphore 和 RateLimiter
//! 3. **向下依赖**：编排层 → pipeline → services
//! 4. **无业务逻辑**：只做调度和统计，不做具体重建判断

pub mod app;
pub mod document_processor;

// 重新导出主要类型
pub use app::App;
pub use document_processor::process_document;
