//! 应用层错误定义
//!
//! 章节生成的失败分类：
//! - GenerationFailure / IncompleteSession / ValidationFailure: 主流程中可恢复，转入回退流程
//! - FallbackFailed / MissingPrerequisite / PersistenceFailure: 终止整次运行

use thiserror::Error;

use crate::domain::book::{BookError, ChapterNumber};
use crate::domain::session::Role;
use crate::domain::ValidationIssue;

use super::ports::ArtifactStoreError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 生成调用出错或超时
    #[error("Chapter {chapter}: generation failed for {role}: {reason}")]
    GenerationFailure {
        chapter: ChapterNumber,
        role: Role,
        reason: String,
    },

    /// 轮次用尽仍没有终稿
    #[error("Chapter {chapter}: session ended after {rounds} rounds without a final chapter")]
    IncompleteSession { chapter: ChapterNumber, rounds: u32 },

    /// 候选或已持久化内容未通过校验
    #[error("Chapter {chapter}: validation failed: {issue}")]
    ValidationFailure {
        chapter: ChapterNumber,
        issue: ValidationIssue,
    },

    /// 前一章产物缺失或无效
    #[error("Chapter {chapter}: previous chapter {previous} is missing or invalid")]
    MissingPrerequisite {
        chapter: ChapterNumber,
        previous: ChapterNumber,
    },

    /// 报告成功后产物不可见
    #[error("Chapter {chapter}: artifact not persisted: {reason}")]
    PersistenceFailure {
        chapter: ChapterNumber,
        reason: String,
    },

    /// 回退流程同样失败
    #[error("Chapter {chapter}: fallback failed ({fallback}) after primary failure ({primary})")]
    FallbackFailed {
        chapter: ChapterNumber,
        primary: Box<ApplicationError>,
        fallback: Box<ApplicationError>,
    },

    /// 大纲无效
    #[error("Invalid outline: {0}")]
    InvalidOutline(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 主流程中可通过回退恢复的错误
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::GenerationFailure { .. }
                | Self::IncompleteSession { .. }
                | Self::ValidationFailure { .. }
        )
    }

    /// 出错的章节
    pub fn chapter(&self) -> Option<ChapterNumber> {
        match self {
            Self::GenerationFailure { chapter, .. }
            | Self::IncompleteSession { chapter, .. }
            | Self::ValidationFailure { chapter, .. }
            | Self::MissingPrerequisite { chapter, .. }
            | Self::PersistenceFailure { chapter, .. }
            | Self::FallbackFailed { chapter, .. } => Some(*chapter),
            Self::InvalidOutline(_) | Self::StorageError(_) => None,
        }
    }

    pub fn generation(chapter: ChapterNumber, role: Role, reason: impl Into<String>) -> Self {
        Self::GenerationFailure {
            chapter,
            role,
            reason: reason.into(),
        }
    }

    pub fn persistence(chapter: ChapterNumber, reason: impl Into<String>) -> Self {
        Self::PersistenceFailure {
            chapter,
            reason: reason.into(),
        }
    }
}

impl From<BookError> for ApplicationError {
    fn from(err: BookError) -> Self {
        Self::InvalidOutline(err.to_string())
    }
}

impl From<ArtifactStoreError> for ApplicationError {
    fn from(err: ArtifactStoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(n: u32) -> ChapterNumber {
        ChapterNumber::new(n).unwrap()
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(ApplicationError::generation(ch(1), Role::Writer, "boom").is_recoverable());
        assert!(ApplicationError::IncompleteSession { chapter: ch(1), rounds: 5 }.is_recoverable());
        assert!(ApplicationError::ValidationFailure {
            chapter: ch(1),
            issue: ValidationIssue::Empty,
        }
        .is_recoverable());

        assert!(!ApplicationError::MissingPrerequisite {
            chapter: ch(3),
            previous: ch(2),
        }
        .is_recoverable());
        assert!(!ApplicationError::persistence(ch(2), "gone").is_recoverable());
    }

    #[test]
    fn test_fallback_failed_message_names_chapter() {
        let err = ApplicationError::FallbackFailed {
            chapter: ch(4),
            primary: Box::new(ApplicationError::generation(ch(4), Role::Writer, "timeout")),
            fallback: Box::new(ApplicationError::IncompleteSession { chapter: ch(4), rounds: 3 }),
        };
        let message = err.to_string();
        assert!(message.starts_with("Chapter 4:"));
        assert!(message.contains("timeout"));
        assert_eq!(err.chapter(), Some(ch(4)));
    }
}
