use crate::models::document::DocumentTask;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载数据并转换为 DocumentTask 对象
pub async fn load_toml_to_task(toml_file_path: &Path) -> Result<DocumentTask> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let task: DocumentTask = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(task.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有 TOML 清单并转换为 DocumentTask 列表
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<DocumentTask>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut tasks = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_toml_to_task(&path).await {
                Ok(task) => {
                    tracing::info!("成功加载任务: {}", task.name);
                    tasks.push(task);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_load_task_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("某試卷.toml");
        tokio::fs::write(
            &manifest,
            r#"
name = "113年第一次模擬考"
paper_text = "papers/mock1.txt"
answer_text = "answers/mock1.txt"
expected_questions = 25
"#,
        )
        .await
        .unwrap();

        let task = assert_ok!(load_toml_to_task(&manifest).await);
        assert_eq!(task.name, "113年第一次模擬考");
        assert_eq!(task.expected_questions, Some(25));
        assert_eq!(task.corrections_text, None);
        assert!(task.file_path.is_some());
    }

    #[tokio::test]
    async fn test_load_all_skips_broken_manifest() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join("good.toml"),
            "name = \"卷一\"\npaper_text = \"a.txt\"\n",
        )
        .await
        .unwrap();
        tokio::fs::write(dir.path().join("bad.toml"), "name = [broken")
            .await
            .unwrap();

        let tasks = load_all_toml_files(dir.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "卷一");
    }
}
