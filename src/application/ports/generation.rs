//! Generation Port - 文本生成能力抽象
//!
//! 引擎只通过"给定会话记录生成一条消息"的能力访问生成后端，
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::ChapterNumber;
use crate::domain::session::{Message, Role};

/// 生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 生成请求
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// 发言角色
    pub role: Role,
    /// 截至目前的完整会话记录（参与者唯一的输入）
    pub transcript: &'a [Message],
    /// 章节编号（用于日志和追踪）
    pub chapter: ChapterNumber,
}

/// 章节完成通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterNotice {
    pub chapter: ChapterNumber,
    pub message: String,
}

impl ChapterNotice {
    pub fn completed(chapter: ChapterNumber) -> Self {
        Self {
            chapter,
            message: format!(
                "Chapter {} is complete. Proceed with next chapter.",
                chapter
            ),
        }
    }
}

/// Generation Port
///
/// 外部生成服务的抽象接口
#[async_trait]
pub trait GenerationPort: Send + Sync {
    /// 以指定角色生成一条消息
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError>;

    /// 章节完成后通知宿主，宿主可据此重置章节级会话状态
    async fn chapter_complete(&self, _notice: &ChapterNotice) {}
}
