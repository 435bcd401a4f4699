//! Outline File - 大纲文件解析
//!
//! 支持两种格式（按扩展名选择）:
//! - JSON: `[{"chapter_number": 1, "title": "...", "prompt": "..."}]`
//!   或 `{"chapters": [...]}`
//! - TOML: `[[chapters]]` 数组

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::book::{BookError, ChapterSpec, Outline};

/// 大纲文件错误
#[derive(Debug, Error)]
pub enum OutlineFileError {
    #[error("Failed to read outline: {0}")]
    ReadError(String),

    #[error("Failed to parse outline: {0}")]
    ParseError(String),

    #[error("Invalid outline: {0}")]
    InvalidOutline(#[from] BookError),
}

/// 大纲文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineFormat {
    Json,
    Toml,
}

impl OutlineFormat {
    /// 按扩展名判断，未知扩展名按 JSON 处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => OutlineFormat::Toml,
            _ => OutlineFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OutlineDocument {
    Bare(Vec<RawChapter>),
    Wrapped { chapters: Vec<RawChapter> },
}

#[derive(Debug, Deserialize)]
struct RawChapter {
    chapter_number: u32,
    title: String,
    #[serde(default)]
    prompt: String,
}

/// 读取并解析大纲文件
pub async fn load_outline(path: &Path) -> Result<Outline, OutlineFileError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| OutlineFileError::ReadError(format!("{}: {}", path.display(), e)))?;

    let outline = parse_outline(&text, OutlineFormat::from_path(path))?;

    tracing::info!(
        path = %path.display(),
        chapters = outline.len(),
        "Outline loaded"
    );

    Ok(outline)
}

/// 解析大纲文本
pub fn parse_outline(text: &str, format: OutlineFormat) -> Result<Outline, OutlineFileError> {
    let document: OutlineDocument = match format {
        OutlineFormat::Json => {
            serde_json::from_str(text).map_err(|e| OutlineFileError::ParseError(e.to_string()))?
        }
        OutlineFormat::Toml => {
            toml::from_str(text).map_err(|e| OutlineFileError::ParseError(e.to_string()))?
        }
    };

    let raw = match document {
        OutlineDocument::Bare(chapters) | OutlineDocument::Wrapped { chapters } => chapters,
    };

    let chapters = raw
        .into_iter()
        .map(|c| ChapterSpec::new(c.chapter_number, c.title, c.prompt))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Outline::new(chapters)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array() {
        let json = r#"[
            {"chapter_number": 2, "title": "Two", "prompt": "second"},
            {"chapter_number": 1, "title": "One", "prompt": "first"}
        ]"#;
        let outline = parse_outline(json, OutlineFormat::Json).unwrap();
        assert_eq!(outline.len(), 2);
        assert_eq!(outline.chapters()[0].title(), "One");
    }

    #[test]
    fn test_parse_wrapped_json() {
        let json = r#"{"chapters": [{"chapter_number": 1, "title": "One", "prompt": "p"}]}"#;
        let outline = parse_outline(json, OutlineFormat::Json).unwrap();
        assert_eq!(outline.last_chapter().get(), 1);
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
[[chapters]]
chapter_number = 1
title = "One"
prompt = "first"

[[chapters]]
chapter_number = 2
title = "Two"
"#;
        let outline = parse_outline(text, OutlineFormat::Toml).unwrap();
        assert_eq!(outline.len(), 2);
        assert_eq!(outline.chapters()[1].prompt(), "");
    }

    #[test]
    fn test_duplicate_numbers_rejected() {
        let json = r#"[
            {"chapter_number": 1, "title": "One", "prompt": "a"},
            {"chapter_number": 1, "title": "Again", "prompt": "b"}
        ]"#;
        assert!(matches!(
            parse_outline(json, OutlineFormat::Json),
            Err(OutlineFileError::InvalidOutline(BookError::DuplicateChapter(_)))
        ));
    }

    #[test]
    fn test_zero_chapter_rejected() {
        let json = r#"[{"chapter_number": 0, "title": "Zero", "prompt": "a"}]"#;
        assert!(matches!(
            parse_outline(json, OutlineFormat::Json),
            Err(OutlineFileError::InvalidOutline(BookError::InvalidChapterNumber(0)))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutlineFormat::from_path(Path::new("book.TOML")), OutlineFormat::Toml);
        assert_eq!(OutlineFormat::from_path(Path::new("outline.json")), OutlineFormat::Json);
    }
}
