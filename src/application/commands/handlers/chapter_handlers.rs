//! Chapter Command Handler - 主流程 / 回退控制
//!
//! 主流程失败（生成出错、轮次用尽、校验不通过）时，在同一份种子上下文上
//! 执行且只执行一次回退流程；回退也失败则返回 Failed，不再重试。

use std::sync::Arc;

use crate::application::commands::{ChapterState, GenerateChapter};
use crate::application::error::ApplicationError;
use crate::application::pipeline::{build_seed, PipelineParams, SeedContext, StagePipelineExecutor};
use crate::application::ports::ArtifactStorePort;
use crate::domain::book::ChapterNumber;
use crate::domain::manuscript::compose;
use crate::domain::validate;
use crate::infrastructure::events::EventPublisher;

/// 已持久化的章节
#[derive(Debug, Clone)]
pub struct PersistedChapter {
    /// 产出该章节的流程名称
    pub pipeline: &'static str,
    /// 会话中的记忆更新块
    pub memory_updates: Vec<String>,
    /// 已发布的产物全文
    pub text: String,
}

/// 单章生成结果
#[derive(Debug)]
pub enum ChapterOutcome {
    Persisted(PersistedChapter),
    /// 主流程与回退流程都失败
    Failed {
        primary: ApplicationError,
        fallback: ApplicationError,
    },
}

/// GenerateChapter Handler
pub struct GenerateChapterHandler {
    executor: Arc<StagePipelineExecutor>,
    store: Arc<dyn ArtifactStorePort>,
    event_publisher: Arc<EventPublisher>,
    primary: PipelineParams,
    fallback: PipelineParams,
}

impl GenerateChapterHandler {
    pub fn new(
        executor: Arc<StagePipelineExecutor>,
        store: Arc<dyn ArtifactStorePort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            executor,
            store,
            event_publisher,
            primary: PipelineParams::primary(),
            fallback: PipelineParams::fallback(),
        }
    }

    pub fn with_pipelines(mut self, primary: PipelineParams, fallback: PipelineParams) -> Self {
        self.primary = primary;
        self.fallback = fallback;
        self
    }

    /// 生成、校验并发布一个章节
    ///
    /// 存储写入失败属于 PersistenceFailure，直接以 Err 返回
    pub async fn handle(&self, command: GenerateChapter) -> Result<ChapterOutcome, ApplicationError> {
        let seed = command.seed;
        let chapter = seed.spec.number();

        let primary = match self.attempt(&self.primary, &seed, ChapterState::ContextPrepared).await {
            Ok(candidate) => return self.persist(chapter, candidate).await,
            Err(e) if e.is_recoverable() => e,
            Err(e) => return Err(e),
        };

        tracing::warn!(
            chapter = %chapter,
            pipeline = self.primary.name,
            error = %primary,
            "Primary pipeline failed, trying fallback"
        );
        log_transition(chapter, ChapterState::Failed, ChapterState::FallbackAttempted);
        self.event_publisher
            .publish_fallback_started(chapter, &primary.to_string());

        match self.attempt(&self.fallback, &seed, ChapterState::FallbackAttempted).await {
            Ok(candidate) => self.persist(chapter, candidate).await,
            Err(fallback) if fallback.is_recoverable() => {
                tracing::error!(
                    chapter = %chapter,
                    pipeline = self.fallback.name,
                    error = %fallback,
                    "Fallback pipeline failed"
                );
                log_transition(chapter, ChapterState::FallbackAttempted, ChapterState::FallbackFailed);
                Ok(ChapterOutcome::Failed { primary, fallback })
            }
            Err(e) => Err(e),
        }
    }

    /// 执行一次会话并校验排版后的候选产物
    async fn attempt(
        &self,
        params: &PipelineParams,
        seed: &SeedContext,
        from: ChapterState,
    ) -> Result<PersistedChapter, ApplicationError> {
        let chapter = seed.spec.number();
        log_transition(chapter, from, ChapterState::PipelineRunning);

        let messages = build_seed(seed, params);
        let output = self.executor.run_session(params, messages, chapter).await?;

        let text = compose(&seed.spec, &output.final_text);
        validate(&text, chapter).map_err(|issue| ApplicationError::ValidationFailure { chapter, issue })?;
        log_transition(chapter, ChapterState::PipelineRunning, ChapterState::Validated);

        Ok(PersistedChapter {
            pipeline: params.name,
            memory_updates: output.memory_updates,
            text,
        })
    }

    async fn persist(
        &self,
        chapter: ChapterNumber,
        candidate: PersistedChapter,
    ) -> Result<ChapterOutcome, ApplicationError> {
        self.store
            .publish(chapter, &candidate.text)
            .await
            .map_err(|e| ApplicationError::persistence(chapter, e.to_string()))?;

        tracing::info!(
            chapter = %chapter,
            pipeline = candidate.pipeline,
            key = %self.store.key(chapter),
            len = candidate.text.len(),
            "Chapter published"
        );
        log_transition(chapter, ChapterState::Validated, ChapterState::Persisted);

        Ok(ChapterOutcome::Persisted(candidate))
    }
}

pub(crate) fn log_transition(chapter: ChapterNumber, from: ChapterState, to: ChapterState) {
    tracing::debug!(chapter = %chapter, from = %from, to = %to, "Chapter state changed");
}
