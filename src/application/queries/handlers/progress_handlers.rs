//! Progress Query Handler

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ArtifactStoreError, ArtifactStorePort};
use crate::application::queries::GetBookProgress;
use crate::domain::book::ChapterNumber;
use crate::domain::is_valid;

/// 单章产物状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// 存在且有效
    Complete,
    /// 存在但未通过校验
    Invalid,
    Missing,
}

impl ArtifactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactStatus::Complete => "complete",
            ArtifactStatus::Invalid => "invalid",
            ArtifactStatus::Missing => "missing",
        }
    }
}

/// 进度响应
#[derive(Debug, Clone)]
pub struct BookProgressResponse {
    pub chapters: Vec<(ChapterNumber, ArtifactStatus)>,
}

impl BookProgressResponse {
    /// 从头开始连续完成的章节数（续跑会复用这些章节）
    pub fn resumable(&self) -> usize {
        self.chapters
            .iter()
            .take_while(|(_, status)| *status == ArtifactStatus::Complete)
            .count()
    }

    /// 下一个需要生成的章节
    pub fn next_chapter(&self) -> Option<ChapterNumber> {
        self.chapters
            .iter()
            .find(|(_, status)| *status != ArtifactStatus::Complete)
            .map(|(chapter, _)| *chapter)
    }

    pub fn is_complete(&self) -> bool {
        self.next_chapter().is_none()
    }
}

/// GetBookProgress Handler
pub struct GetBookProgressHandler {
    store: Arc<dyn ArtifactStorePort>,
}

impl GetBookProgressHandler {
    pub fn new(store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetBookProgress) -> Result<BookProgressResponse, ApplicationError> {
        let mut chapters = Vec::with_capacity(query.outline.len());

        for spec in query.outline.chapters() {
            let chapter = spec.number();
            let status = match self.store.read(chapter).await {
                Ok(Some(content)) if is_valid(&content, chapter) => ArtifactStatus::Complete,
                Ok(Some(_)) | Err(ArtifactStoreError::InvalidContent(..)) => ArtifactStatus::Invalid,
                Ok(None) => ArtifactStatus::Missing,
                Err(e) => return Err(e.into()),
            };
            chapters.push((chapter, status));
        }

        Ok(BookProgressResponse { chapters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{ChapterSpec, Outline};
    use crate::infrastructure::adapters::FileArtifactStore;
    use crate::infrastructure::memory::InMemoryArtifactStore;
    use tempfile::tempdir;

    fn ch(n: u32) -> ChapterNumber {
        ChapterNumber::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_progress_reports_each_chapter() {
        let store = InMemoryArtifactStore::new().arc();
        store.insert(ch(1), "Chapter 1: One\n\nFirst line.\nSecond line.\n").await;
        store.insert(ch(2), "Chapter 2: Two").await;

        let outline = Outline::new(
            (1..=3)
                .map(|n| ChapterSpec::new(n, format!("Part {}", n), "").unwrap())
                .collect(),
        )
        .unwrap();

        let handler = GetBookProgressHandler::new(store);
        let progress = handler.handle(GetBookProgress { outline }).await.unwrap();

        assert_eq!(
            progress.chapters,
            vec![
                (ch(1), ArtifactStatus::Complete),
                (ch(2), ArtifactStatus::Invalid),
                (ch(3), ArtifactStatus::Missing),
            ]
        );
        assert_eq!(progress.resumable(), 1);
        assert_eq!(progress.next_chapter(), Some(ch(2)));
        assert!(!progress.is_complete());
    }

    #[tokio::test]
    async fn test_unreadable_artifact_reports_invalid() {
        let temp_dir = tempdir().unwrap();
        let store = Arc::new(FileArtifactStore::new(temp_dir.path()).await.unwrap());
        std::fs::write(temp_dir.path().join("chapter_01.txt"), [0xff, 0xfe, 0x00, b'\n']).unwrap();
        let outline = Outline::new(vec![ChapterSpec::new(1, "One", "").unwrap()]).unwrap();

        let progress = GetBookProgressHandler::new(store)
            .handle(GetBookProgress { outline })
            .await
            .unwrap();

        assert_eq!(progress.chapters, vec![(ch(1), ArtifactStatus::Invalid)]);
        assert_eq!(progress.chapters[0].1.as_str(), "invalid");
        assert_eq!(progress.next_chapter(), Some(ch(1)));
    }
}
