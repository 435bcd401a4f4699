//! Book Context - Entities

use serde::{Deserialize, Serialize};

use super::{BookError, ChapterNumber};

/// 章节规格 - 大纲中的一项
///
/// 不变量:
/// - number >= 1
/// - title 不可为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSpec {
    /// 章节编号
    #[serde(rename = "chapter_number")]
    number: ChapterNumber,
    /// 章节标题
    title: String,
    /// 章节写作要求
    prompt: String,
}

impl ChapterSpec {
    pub fn new(
        number: u32,
        title: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Result<Self, BookError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(BookError::InvalidTitle(title));
        }
        Ok(Self {
            number: ChapterNumber::new(number)?,
            title,
            prompt: prompt.into(),
        })
    }

    pub fn number(&self) -> ChapterNumber {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}
