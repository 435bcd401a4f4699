//! In-Memory Artifact Store Implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::ports::{ArtifactStoreError, ArtifactStorePort};
use crate::domain::book::ChapterNumber;
use crate::domain::context::ContextState;

/// 内存产物存储
#[derive(Default)]
pub struct InMemoryArtifactStore {
    /// chapter -> content
    artifacts: RwLock<HashMap<ChapterNumber, String>>,
    /// 上下文检查点
    context: RwLock<Option<ContextState>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 直接写入产物（绕过不可变检查，模拟外部写入）
    pub async fn insert(&self, chapter: ChapterNumber, content: impl Into<String>) {
        self.artifacts.write().await.insert(chapter, content.into());
    }
}

#[async_trait]
impl ArtifactStorePort for InMemoryArtifactStore {
    async fn exists(&self, chapter: ChapterNumber) -> Result<bool, ArtifactStoreError> {
        Ok(self.artifacts.read().await.contains_key(&chapter))
    }

    async fn read(&self, chapter: ChapterNumber) -> Result<Option<String>, ArtifactStoreError> {
        Ok(self.artifacts.read().await.get(&chapter).cloned())
    }

    async fn publish(&self, chapter: ChapterNumber, content: &str) -> Result<(), ArtifactStoreError> {
        let mut artifacts = self.artifacts.write().await;
        if artifacts.contains_key(&chapter) {
            return Err(ArtifactStoreError::AlreadyExists(self.key(chapter)));
        }
        artifacts.insert(chapter, content.to_string());
        Ok(())
    }

    async fn remove(&self, chapter: ChapterNumber) -> Result<(), ArtifactStoreError> {
        self.artifacts.write().await.remove(&chapter);
        Ok(())
    }

    async fn save_context(&self, context: &ContextState) -> Result<(), ArtifactStoreError> {
        *self.context.write().await = Some(context.clone());
        Ok(())
    }

    async fn load_context(&self) -> Result<Option<ContextState>, ArtifactStoreError> {
        Ok(self.context.read().await.clone())
    }
}
