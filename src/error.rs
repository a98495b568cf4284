use thiserror::Error;

/// 应用程序错误类型
///
/// 只覆盖基础设施类失败（文件、解析、缓存、配置）。
/// 数据质量问题不走错误通道：缺题、缺选项、答案冲突等
/// 一律通过校验报告表达。
#[derive(Debug, Error)]
pub enum AppError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 缓存条目损坏
    #[error("缓存条目损坏 ({key}): {source}")]
    CacheCorrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON 序列化/反序列化失败
    #[error("JSON处理失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
