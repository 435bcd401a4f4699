//! File Artifact Store - 文件系统章节产物存储实现
//!
//! 实现 ArtifactStorePort trait
//!
//! 目录结构:
//! - {base_dir}/chapter_01.txt
//! - {base_dir}/context.json   上下文检查点
//!
//! 发布流程：写入同目录临时文件 → fsync → hard_link 到目标（目标已存在则失败），
//! 保证产物要么完整可见要么不存在，且已发布的产物不会被覆盖。检查点仍用 rename 覆盖。

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::application::ports::{ArtifactStoreError, ArtifactStorePort};
use crate::domain::book::ChapterNumber;
use crate::domain::context::ContextState;

const CONTEXT_FILE_NAME: &str = "context.json";

/// 文件系统产物存储
pub struct FileArtifactStore {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileArtifactStore {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, ArtifactStoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ArtifactStoreError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 章节产物路径
    pub fn artifact_path(&self, chapter: ChapterNumber) -> PathBuf {
        self.base_dir.join(format!("{}.txt", chapter.artifact_key()))
    }

    fn context_path(&self) -> PathBuf {
        self.base_dir.join(CONTEXT_FILE_NAME)
    }

    /// 写入同目录临时文件并 fsync，返回临时文件路径
    async fn write_temp(&self, target: &Path, content: &[u8]) -> Result<PathBuf, ArtifactStoreError> {
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp_path = self
            .base_dir
            .join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let result = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(content).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ArtifactStoreError::IoError(e.to_string()));
        }

        Ok(temp_path)
    }

    /// 写临时文件后原子替换到目标路径（允许覆盖，用于检查点）
    async fn write_atomic(&self, target: &Path, content: &[u8]) -> Result<(), ArtifactStoreError> {
        let temp_path = self.write_temp(target, content).await?;

        if let Err(e) = fs::rename(&temp_path, target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ArtifactStoreError::IoError(e.to_string()));
        }

        Ok(())
    }

    /// 写临时文件后以硬链接发布，目标已存在时失败而不是覆盖
    async fn write_new(&self, chapter: ChapterNumber, content: &[u8]) -> Result<(), ArtifactStoreError> {
        let target = self.artifact_path(chapter);
        let temp_path = self.write_temp(&target, content).await?;

        let linked = fs::hard_link(&temp_path, &target).await;
        let _ = fs::remove_file(&temp_path).await;

        match linked {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(ArtifactStoreError::AlreadyExists(self.key(chapter)))
            }
            Err(e) => Err(ArtifactStoreError::IoError(e.to_string())),
        }
    }

    async fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>, ArtifactStoreError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ArtifactStoreError::IoError(e.to_string())),
        }
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    async fn exists(&self, chapter: ChapterNumber) -> Result<bool, ArtifactStoreError> {
        fs::try_exists(self.artifact_path(chapter))
            .await
            .map_err(|e| ArtifactStoreError::IoError(e.to_string()))
    }

    async fn read(&self, chapter: ChapterNumber) -> Result<Option<String>, ArtifactStoreError> {
        let Some(bytes) = Self::read_bytes(&self.artifact_path(chapter)).await? else {
            return Ok(None);
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| ArtifactStoreError::InvalidContent(self.key(chapter), e.to_string()))
    }

    async fn publish(&self, chapter: ChapterNumber, content: &str) -> Result<(), ArtifactStoreError> {
        self.write_new(chapter, content.as_bytes()).await?;

        tracing::debug!(
            chapter = %chapter,
            path = %self.artifact_path(chapter).display(),
            size = content.len(),
            "Published chapter artifact"
        );

        Ok(())
    }

    async fn remove(&self, chapter: ChapterNumber) -> Result<(), ArtifactStoreError> {
        match fs::remove_file(self.artifact_path(chapter)).await {
            Ok(()) => {
                tracing::info!(chapter = %chapter, "Removed chapter artifact");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArtifactStoreError::IoError(e.to_string())),
        }
    }

    async fn save_context(&self, context: &ContextState) -> Result<(), ArtifactStoreError> {
        let json = serde_json::to_vec_pretty(context)
            .map_err(|e| ArtifactStoreError::SerializationError(e.to_string()))?;
        self.write_atomic(&self.context_path(), &json).await
    }

    async fn load_context(&self) -> Result<Option<ContextState>, ArtifactStoreError> {
        let Some(json) = Self::read_bytes(&self.context_path()).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&json)
            .map(Some)
            .map_err(|e| ArtifactStoreError::SerializationError(e.to_string()))
    }
}
