//! Context State - 跨章节累积记忆的状态与上下文构建

use serde::{Deserialize, Serialize};

use super::MemoryDirective;
use crate::domain::book::ChapterNumber;

pub const NO_WORLD_ELEMENTS_SENTINEL: &str = "No established world elements yet.";
pub const NO_CHARACTERS_SENTINEL: &str = "No character developments tracked yet.";

/// 跨章节累积记忆
///
/// 不变量:
/// - chapter_summaries 只追加，每个完成的章节一条
/// - world_elements 同名覆盖（后写为准），保留首次出现的位置
/// - character_developments 每个角色的条目只追加且保持顺序
///
/// 作为显式值由 Sequencer 持有并在运行结束时返回。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextState {
    #[serde(default)]
    chapter_summaries: Vec<String>,
    #[serde(default)]
    world_elements: Vec<(String, String)>,
    #[serde(default)]
    character_developments: Vec<(String, Vec<String>)>,
}

impl ContextState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新世界元素（后写为准）
    pub fn update_world_element(&mut self, name: impl Into<String>, description: impl Into<String>) {
        let name = name.into();
        let description = description.into();
        match self.world_elements.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = description,
            None => self.world_elements.push((name, description)),
        }
    }

    /// 追加角色发展条目，角色不存在时创建
    pub fn update_character_development(&mut self, name: impl Into<String>, entry: impl Into<String>) {
        let name = name.into();
        let entry = entry.into();
        match self.character_developments.iter_mut().find(|(n, _)| *n == name) {
            Some((_, entries)) => entries.push(entry),
            None => self.character_developments.push((name, vec![entry])),
        }
    }

    pub fn push_summary(&mut self, summary: impl Into<String>) {
        self.chapter_summaries.push(summary.into());
    }

    /// 取出全部摘要（续跑时用于恢复已完成章节的摘要）
    pub fn take_summaries(&mut self) -> Vec<String> {
        std::mem::take(&mut self.chapter_summaries)
    }

    /// 应用记忆指令，返回是否修改了状态
    pub fn apply(&mut self, directive: &MemoryDirective) -> bool {
        match directive {
            MemoryDirective::World { name, description } => {
                self.update_world_element(name.as_str(), description.as_str());
                true
            }
            MemoryDirective::Character { name, entry } => {
                self.update_character_development(name.as_str(), entry.as_str());
                true
            }
            MemoryDirective::Event(_) | MemoryDirective::ContinuityAlert(_) => false,
        }
    }

    pub fn summaries(&self) -> &[String] {
        &self.chapter_summaries
    }

    pub fn world_element(&self, name: &str) -> Option<&str> {
        self.world_elements
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_str())
    }

    pub fn character_development(&self, name: &str) -> Option<&[String]> {
        self.character_developments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn format_world_context(&self) -> String {
        if self.world_elements.is_empty() {
            return NO_WORLD_ELEMENTS_SENTINEL.to_string();
        }

        let mut parts = vec!["Established World Elements:".to_string()];
        parts.extend(
            self.world_elements
                .iter()
                .map(|(name, desc)| format!("- {}: {}", name, desc)),
        );
        parts.join("\n")
    }

    pub fn format_character_context(&self) -> String {
        if self.character_developments.is_empty() {
            return NO_CHARACTERS_SENTINEL.to_string();
        }

        let mut parts = vec!["Character Development History:".to_string()];
        parts.extend(
            self.character_developments
                .iter()
                .map(|(name, entries)| format!("- {}:\n  {}", name, entries.join("\n  "))),
        );
        parts.join("\n")
    }

    /// 构建章节上下文
    ///
    /// - 第 1 章: 仅 "Initial Chapter" 标记和要求
    /// - 第 n 章: 前 n-1 章摘要（按章节序号标注）+ 当前要求
    pub fn build_chapter_context(&self, chapter: ChapterNumber, prompt: &str) -> String {
        if chapter.is_first() {
            return format!("Initial Chapter\nRequirements:\n{}", prompt);
        }

        let previous = (chapter.get() - 1) as usize;
        let mut parts = vec!["Previous Chapter Summaries:".to_string()];
        parts.extend(
            self.chapter_summaries
                .iter()
                .take(previous)
                .enumerate()
                .map(|(i, summary)| format!("Chapter {}: {}", i + 1, summary)),
        );
        parts.push("\nCurrent Chapter Requirements:".to_string());
        parts.push(prompt.to_string());
        parts.join("\n")
    }
}
