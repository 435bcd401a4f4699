//! Book Context - Errors

use thiserror::Error;

use super::ChapterNumber;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("大纲为空")]
    EmptyOutline,

    #[error("章节编号重复: {0}")]
    DuplicateChapter(ChapterNumber),

    #[error("无效的章节编号: {0}")]
    InvalidChapterNumber(u32),

    #[error("无效的章节标题: {0}")]
    InvalidTitle(String),
}
