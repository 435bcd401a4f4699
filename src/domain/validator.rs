//! 章节内容校验
//!
//! 判断章节文本在结构上是否可接受。纯函数，无副作用。

use super::book::ChapterNumber;

/// 记忆更新标记，含此标记的行不计入正文
pub const MEMORY_UPDATE_MARKER: &str = "MEMORY UPDATE:";

/// 计入的最少信息行数（标题行 + 至少两行正文）
pub const MIN_INFORMATIVE_LINES: usize = 3;

/// 校验失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// 内容为空
    Empty,
    /// 缺少 "Chapter {n}" 标记
    MissingHeader(String),
    /// 信息行不足
    TooFewLines { found: usize },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::Empty => write!(f, "content is empty"),
            ValidationIssue::MissingHeader(marker) => write!(f, "missing header \"{}\"", marker),
            ValidationIssue::TooFewLines { found } => write!(
                f,
                "only {} informative lines, need at least {}",
                found, MIN_INFORMATIVE_LINES
            ),
        }
    }
}

/// 校验章节内容，返回失败原因
pub fn validate(content: &str, chapter: ChapterNumber) -> Result<(), ValidationIssue> {
    if content.is_empty() {
        return Err(ValidationIssue::Empty);
    }

    let marker = chapter.header_marker();
    if !content.contains(&marker) {
        return Err(ValidationIssue::MissingHeader(marker));
    }

    let found = content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.contains(MEMORY_UPDATE_MARKER))
        .count();

    if found < MIN_INFORMATIVE_LINES {
        return Err(ValidationIssue::TooFewLines { found });
    }

    Ok(())
}

/// 章节内容是否有效
pub fn is_valid(content: &str, chapter: ChapterNumber) -> bool {
    validate(content, chapter).is_ok()
}
