//! 记录缓存服务 - 业务能力层
//!
//! 以源文档内容哈希为键缓存重建出的题目记录，避免同一份
//! 文档在时间窗口内被重复计算。缓存作为显式接口注入管线
//! 入口，不存在进程级单例。

use crate::error::{AppError, AppResult};
use crate::models::QuestionRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// 计算源文档文字的内容哈希（缓存键）
pub fn content_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// 记录缓存接口
pub trait CacheStore: Send + Sync {
    /// 读取缓存；超过新鲜窗口的条目视同不存在
    fn get(&self, key: &str) -> AppResult<Option<Vec<QuestionRecord>>>;

    /// 写入缓存（按键整体覆盖）
    fn put(&self, key: &str, records: &[QuestionRecord]) -> AppResult<()>;
}

/// 缓存条目的落盘格式
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    created_at: DateTime<Utc>,
    records: Vec<QuestionRecord>,
}

/// JSON 文件缓存
///
/// 每个键一个文件；写入走 临时文件 + rename，保证两个并发
/// 处理同一份文档的工作者不会交错出半截条目。
pub struct JsonFileCache {
    dir: PathBuf,
    freshness: Duration,
}

impl JsonFileCache {
    /// 创建缓存
    ///
    /// # 参数
    /// - `dir`: 缓存目录（不存在时创建）
    /// - `freshness_days`: 新鲜窗口天数，超龄条目视同不存在
    pub fn new(dir: impl Into<PathBuf>, freshness_days: i64) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| AppError::FileWrite {
            path: dir.display().to_string(),
            source: e,
        })?;
        Ok(Self {
            dir,
            freshness: Duration::days(freshness_days),
        })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CacheStore for JsonFileCache {
    fn get(&self, key: &str) -> AppResult<Option<Vec<QuestionRecord>>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| AppError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let entry: CacheEntry =
            serde_json::from_str(&content).map_err(|e| AppError::CacheCorrupt {
                key: key.to_string(),
                source: e,
            })?;

        if Utc::now() - entry.created_at > self.freshness {
            debug!("缓存过期: {}", key);
            return Ok(None);
        }

        debug!("缓存命中: {} ({} 条记录)", key, entry.records.len());
        Ok(Some(entry.records))
    }

    fn put(&self, key: &str, records: &[QuestionRecord]) -> AppResult<()> {
        let entry = CacheEntry {
            created_at: Utc::now(),
            records: records.to_vec(),
        };
        let content = serde_json::to_string(&entry)?;

        // 写临时文件再原子改名；临时名带进程号，
        // 并发工作者各写各的
        let tmp = self
            .dir
            .join(format!("{}.json.{}.tmp", key, std::process::id()));
        fs::write(&tmp, content).map_err(|e| AppError::FileWrite {
            path: tmp.display().to_string(),
            source: e,
        })?;
        let path = self.entry_path(key);
        fs::rename(&tmp, &path).map_err(|e| AppError::FileWrite {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }
}
