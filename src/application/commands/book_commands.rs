//! Book Commands - 书籍与章节生成命令

use crate::application::pipeline::SeedContext;
use crate::domain::book::Outline;

/// 生成整本书（按大纲顺序，可续跑）
#[derive(Debug, Clone)]
pub struct GenerateBook {
    pub outline: Outline,
}

/// 生成单个章节（主流程 + 至多一次回退）
#[derive(Debug, Clone)]
pub struct GenerateChapter {
    pub seed: SeedContext,
}

/// 单章状态，状态变化时记录日志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterState {
    NotStarted,
    ContextPrepared,
    PipelineRunning,
    Validated,
    Persisted,
    Failed,
    FallbackAttempted,
    FallbackFailed,
}

impl ChapterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterState::NotStarted => "not_started",
            ChapterState::ContextPrepared => "context_prepared",
            ChapterState::PipelineRunning => "pipeline_running",
            ChapterState::Validated => "validated",
            ChapterState::Persisted => "persisted",
            ChapterState::Failed => "failed",
            ChapterState::FallbackAttempted => "fallback_attempted",
            ChapterState::FallbackFailed => "fallback_failed",
        }
    }
}

impl std::fmt::Display for ChapterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
