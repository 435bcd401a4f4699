//! Book Context - Value Objects

use serde::{Deserialize, Serialize};

use super::BookError;

/// 章节编号，从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ChapterNumber(u32);

impl ChapterNumber {
    pub fn new(number: u32) -> Result<Self, BookError> {
        if number == 0 {
            return Err(BookError::InvalidChapterNumber(number));
        }
        Ok(Self(number))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn is_first(&self) -> bool {
        self.0 == 1
    }

    /// 前一章编号，第一章没有前驱
    pub fn previous(&self) -> Option<Self> {
        (self.0 > 1).then(|| Self(self.0 - 1))
    }

    /// 章节产物的确定性地址，例如第 3 章为 `chapter_03`
    pub fn artifact_key(&self) -> ArtifactKey {
        ArtifactKey(format!("chapter_{:02}", self.0))
    }

    /// 章节标记文本，产物中必须包含
    pub fn header_marker(&self) -> String {
        format!("Chapter {}", self.0)
    }
}

impl TryFrom<u32> for ChapterNumber {
    type Error = BookError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChapterNumber> for u32 {
    fn from(number: ChapterNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节产物地址
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_rejected() {
        assert!(ChapterNumber::new(0).is_err());
    }

    #[test]
    fn test_artifact_key_is_zero_padded() {
        assert_eq!(ChapterNumber::new(3).unwrap().artifact_key().as_str(), "chapter_03");
        assert_eq!(ChapterNumber::new(12).unwrap().artifact_key().as_str(), "chapter_12");
    }

    #[test]
    fn test_previous() {
        assert_eq!(ChapterNumber::new(1).unwrap().previous(), None);
        assert_eq!(
            ChapterNumber::new(4).unwrap().previous(),
            Some(ChapterNumber::new(3).unwrap())
        );
    }
}
