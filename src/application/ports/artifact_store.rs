//! Artifact Store Port - 章节产物存储
//!
//! 产物存在且通过校验是唯一的续跑依据，因此发布必须是原子的：
//! 要么完整可见，要么不存在。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::{ArtifactKey, ChapterNumber};
use crate::domain::context::ContextState;

/// 产物存储错误
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Artifact already exists: {0}")]
    AlreadyExists(ArtifactKey),

    /// 产物存在但内容不可读（例如不是合法 UTF-8），按无效产物处理
    #[error("Artifact {0} has unreadable content: {1}")]
    InvalidContent(ArtifactKey, String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Artifact Store Port - 出站端口
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 产物地址
    fn key(&self, chapter: ChapterNumber) -> ArtifactKey {
        chapter.artifact_key()
    }

    /// 产物是否存在
    async fn exists(&self, chapter: ChapterNumber) -> Result<bool, ArtifactStoreError>;

    /// 读取产物，不存在时返回 None；内容不可读时返回 InvalidContent
    async fn read(&self, chapter: ChapterNumber) -> Result<Option<String>, ArtifactStoreError>;

    /// 原子发布产物；已存在时返回 AlreadyExists（产物一经写入不可变）
    async fn publish(&self, chapter: ChapterNumber, content: &str) -> Result<(), ArtifactStoreError>;

    /// 删除产物（外部操作，用于强制重新生成）
    async fn remove(&self, chapter: ChapterNumber) -> Result<(), ArtifactStoreError>;

    /// 保存上下文检查点
    async fn save_context(&self, context: &ContextState) -> Result<(), ArtifactStoreError>;

    /// 读取上下文检查点
    async fn load_context(&self) -> Result<Option<ContextState>, ArtifactStoreError>;
}
