/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 任务清单（TOML）存放目录
    pub task_folder: String,
    /// 记录输出目录
    pub output_folder: String,
    /// 缓存目录
    pub cache_folder: String,
    /// 缓存新鲜窗口（天）
    pub cache_freshness_days: i64,
    /// 外部文字来源的最小访问间隔（毫秒，0 表示不节流）
    pub min_source_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 警告文件
    pub warn_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_documents: 4,
            task_folder: "tasks".to_string(),
            output_folder: "output".to_string(),
            cache_folder: ".cache/records".to_string(),
            cache_freshness_days: 7,
            min_source_interval_ms: 0,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_documents: std::env::var("MAX_CONCURRENT_DOCUMENTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_documents),
            task_folder: std::env::var("TASK_FOLDER").unwrap_or(default.task_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            cache_folder: std::env::var("CACHE_FOLDER").unwrap_or(default.cache_folder),
            cache_freshness_days: std::env::var("CACHE_FRESHNESS_DAYS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.cache_freshness_days),
            min_source_interval_ms: std::env::var("MIN_SOURCE_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.min_source_interval_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(default.warn_file),
        }
    }
}
