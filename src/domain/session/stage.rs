//! Stage Output - 带标签的阶段输出
//!
//! 参与者输出以标签行开头（如 `CHAPTER FINAL:`）。找不到可识别标签时，
//! 整段输出按该参与者预期的阶段处理，而不是直接失败。

use serde::{Deserialize, Serialize};

/// 阶段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Plan,
    Draft,
    Feedback,
    Final,
    MemoryUpdate,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Plan => "plan",
            StageKind::Draft => "draft",
            StageKind::Feedback => "feedback",
            StageKind::Final => "final",
            StageKind::MemoryUpdate => "memory_update",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 标签表，按匹配优先级排列
const TAGS: &[(&str, StageKind)] = &[
    ("CHAPTER FINAL:", StageKind::Final),
    ("SCENE FINAL:", StageKind::Final),
    ("MEMORY UPDATE:", StageKind::MemoryUpdate),
    ("EDITED_SCENE:", StageKind::Draft),
    ("FEEDBACK:", StageKind::Feedback),
    ("CHAPTER:", StageKind::Draft),
    ("SCENE:", StageKind::Draft),
    ("PLAN:", StageKind::Plan),
    ("OUTLINE:", StageKind::Plan),
];

/// 解析后的阶段输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub kind: StageKind,
    pub payload: String,
    /// 是否由标签识别（false 表示回退到预期阶段）
    pub tagged: bool,
}

impl StageOutput {
    /// 解析参与者输出
    pub fn parse(raw: &str, expected: StageKind) -> Self {
        let lines: Vec<&str> = raw.lines().collect();

        for (index, line) in lines.iter().enumerate() {
            let stripped = line.trim().trim_start_matches(['*', '#', ' ']);
            let Some((tag, kind)) = TAGS.iter().find(|(tag, _)| stripped.starts_with(tag)) else {
                continue;
            };

            let rest = stripped[tag.len()..].trim().trim_matches('*').trim();
            let mut payload_lines: Vec<&str> = Vec::with_capacity(lines.len() - index);
            if !rest.is_empty() {
                payload_lines.push(rest);
            }
            payload_lines.extend(&lines[index + 1..]);

            return Self {
                kind: *kind,
                payload: payload_lines.join("\n").trim().to_string(),
                tagged: true,
            };
        }

        Self {
            kind: expected,
            payload: raw.trim().to_string(),
            tagged: false,
        }
    }

    pub fn is_final(&self) -> bool {
        self.kind == StageKind::Final
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_final() {
        let output = StageOutput::parse("CHAPTER FINAL:\nChapter 1\nText", StageKind::Draft);
        assert_eq!(output.kind, StageKind::Final);
        assert_eq!(output.payload, "Chapter 1\nText");
        assert!(output.tagged);
    }

    #[test]
    fn test_untagged_falls_back_to_expected_stage() {
        let output = StageOutput::parse("  Chapter 2\nSome prose  ", StageKind::Final);
        assert_eq!(output.kind, StageKind::Final);
        assert_eq!(output.payload, "Chapter 2\nSome prose");
        assert!(!output.tagged);
    }

    #[test]
    fn test_preamble_before_tag_is_dropped() {
        let output = StageOutput::parse(
            "Sure, here is my review.\n**FEEDBACK:** pacing is slow\nSUGGEST: cut",
            StageKind::Final,
        );
        assert_eq!(output.kind, StageKind::Feedback);
        assert_eq!(output.payload, "pacing is slow\nSUGGEST: cut");
        assert!(!output.is_final());
    }

    #[test]
    fn test_first_tag_wins() {
        let output = StageOutput::parse(
            "FEEDBACK: too short\nEDITED_SCENE:\nChapter 1 text",
            StageKind::Draft,
        );
        assert_eq!(output.kind, StageKind::Feedback);
    }

    #[test]
    fn test_memory_update_payload() {
        let output = StageOutput::parse(
            "MEMORY UPDATE:\nEVENT: storm\nWORLD: Bay: flooded",
            StageKind::MemoryUpdate,
        );
        assert_eq!(output.kind, StageKind::MemoryUpdate);
        assert_eq!(output.payload, "EVENT: storm\nWORLD: Bay: flooded");
    }

    #[test]
    fn test_draft_tag_is_not_final() {
        let output = StageOutput::parse("CHAPTER: Chapter 1\nDraft", StageKind::Final);
        assert_eq!(output.kind, StageKind::Draft);
        assert_eq!(output.payload, "Chapter 1\nDraft");
    }
}
