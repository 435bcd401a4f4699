//! Scripted Generation Client - 用于测试和演练的生成客户端
//!
//! 按脚本函数返回固定输出，不实际调用生成服务，并记录每次调用和完成通知

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::application::ports::{
    ChapterNotice, GenerationError, GenerationPort, GenerationRequest,
};
use crate::domain::book::ChapterNumber;
use crate::domain::session::Role;

type ScriptFn = dyn Fn(&GenerationRequest<'_>) -> Result<String, GenerationError> + Send + Sync;

/// 一次调用的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedCall {
    pub role: Role,
    pub chapter: ChapterNumber,
    /// 调用时会话记录长度
    pub transcript_len: usize,
}

/// Scripted Generation Client
pub struct ScriptedGenerationClient {
    script: Box<ScriptFn>,
    /// 模拟调用延迟
    latency: Option<Duration>,
    calls: Mutex<Vec<ScriptedCall>>,
    notices: Mutex<Vec<ChapterNotice>>,
}

impl ScriptedGenerationClient {
    pub fn new(
        script: impl Fn(&GenerationRequest<'_>) -> Result<String, GenerationError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            latency: None,
            calls: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    /// 每个角色都按约定格式输出，产出可通过校验的章节
    pub fn well_behaved() -> Self {
        Self::new(|request| Ok(Self::canned_response(request)))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// 各角色的标准输出
    pub fn canned_response(request: &GenerationRequest<'_>) -> String {
        let n = request.chapter;
        match request.role {
            Role::MemoryKeeper => format!(
                "MEMORY UPDATE:\nEVENT: the events of chapter {n} unfold\n\
                 CHARACTER: Dane: changes during chapter {n}\n\
                 WORLD: Forest: as it stands after chapter {n}"
            ),
            Role::StoryPlanner => format!("PLAN: a short plan for chapter {n}"),
            Role::Writer => format!(
                "Chapter {n}\nThe draft opens at the river.\nDane hesitates at the water."
            ),
            Role::Editor => "FEEDBACK: tighten the opening and keep the outline beat.".to_string(),
            Role::WriterFinal => format!(
                "CHAPTER FINAL:\nChapter {n}\nThe river ran cold that morning.\nDane did not look back."
            ),
            Role::Controller => String::new(),
        }
    }

    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 某章的调用次数
    pub fn calls_for(&self, chapter: ChapterNumber) -> usize {
        self.calls().iter().filter(|c| c.chapter == chapter).count()
    }

    pub fn notices(&self) -> Vec<ChapterNotice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl GenerationPort for ScriptedGenerationClient {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ScriptedCall {
                role: request.role,
                chapter: request.chapter,
                transcript_len: request.transcript.len(),
            });

        tracing::debug!(
            chapter = %request.chapter,
            role = %request.role,
            "ScriptedGenerationClient: returning scripted output"
        );

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        (self.script)(&request)
    }

    async fn chapter_complete(&self, notice: &ChapterNotice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
