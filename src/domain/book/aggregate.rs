//! Book Context - Aggregate Root

use std::collections::HashSet;

use super::{BookError, ChapterNumber, ChapterSpec};

/// Outline 聚合根
///
/// 不变量:
/// - 至少包含一个章节
/// - chapter_number 唯一
/// - chapters() 始终按编号升序返回，与输入顺序无关
#[derive(Debug, Clone)]
pub struct Outline {
    chapters: Vec<ChapterSpec>,
}

impl Outline {
    pub fn new(mut chapters: Vec<ChapterSpec>) -> Result<Self, BookError> {
        if chapters.is_empty() {
            return Err(BookError::EmptyOutline);
        }

        let mut seen = HashSet::with_capacity(chapters.len());
        for chapter in &chapters {
            if !seen.insert(chapter.number()) {
                return Err(BookError::DuplicateChapter(chapter.number()));
            }
        }

        chapters.sort_by_key(|c| c.number());
        Ok(Self { chapters })
    }

    pub fn chapters(&self) -> &[ChapterSpec] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// 大纲中最后一章的编号
    pub fn last_chapter(&self) -> ChapterNumber {
        // new() 保证非空
        self.chapters[self.chapters.len() - 1].number()
    }

    /// 渲染完整大纲，作为每次会话的系统消息
    pub fn format_outline(&self) -> String {
        let mut parts = vec!["Complete Book Outline:".to_string()];
        for chapter in &self.chapters {
            parts.push(format!(
                "\nChapter {}: {}\n{}",
                chapter.number(),
                chapter.title(),
                chapter.prompt()
            ));
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(n: u32) -> ChapterSpec {
        ChapterSpec::new(n, format!("Title {}", n), format!("Prompt {}", n)).unwrap()
    }

    #[test]
    fn test_chapters_sorted_regardless_of_input_order() {
        let outline = Outline::new(vec![spec(3), spec(1), spec(2)]).unwrap();
        let numbers: Vec<u32> = outline.chapters().iter().map(|c| c.number().get()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(outline.last_chapter().get(), 3);
    }

    #[test]
    fn test_duplicate_chapter_rejected() {
        let result = Outline::new(vec![spec(1), spec(2), spec(1)]);
        assert!(matches!(result, Err(BookError::DuplicateChapter(n)) if n.get() == 1));
    }

    #[test]
    fn test_empty_outline_rejected() {
        assert!(matches!(Outline::new(vec![]), Err(BookError::EmptyOutline)));
    }

    #[test]
    fn test_format_outline() {
        let outline = Outline::new(vec![spec(2), spec(1)]).unwrap();
        let text = outline.format_outline();
        assert!(text.starts_with("Complete Book Outline:"));
        let first = text.find("Chapter 1: Title 1").unwrap();
        let second = text.find("Chapter 2: Title 2").unwrap();
        assert!(first < second);
    }
}
