//! Book Command Handler - 章节顺序编排
//!
//! 按大纲升序逐章推进：
//! 1. 第 n 章（n>1）要求第 n-1 章产物存在且有效，否则终止整次运行
//! 2. 第 n 章产物已存在且有效时直接复用（续跑）
//! 3. 否则构建上下文、调用 GenerateChapterHandler、回读确认、更新上下文
//!
//! 任何致命错误都会终止运行，不会跳过章节继续。

use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::handlers::chapter_handlers::log_transition;
use crate::application::commands::handlers::{ChapterOutcome, GenerateChapterHandler};
use crate::application::commands::{ChapterState, GenerateBook, GenerateChapter};
use crate::application::error::ApplicationError;
use crate::application::pipeline::SeedContext;
use crate::application::ports::{ArtifactStoreError, ArtifactStorePort, ChapterNotice, GenerationPort};
use crate::domain::book::{ChapterNumber, ChapterSpec, Outline};
use crate::domain::context::{ContextState, MemoryDirective};
use crate::domain::manuscript::{summarize, summary_from};
use crate::domain::validate;
use crate::infrastructure::events::EventPublisher;

/// 运行终止信息
#[derive(Debug)]
pub struct RunHalt {
    pub chapter: ChapterNumber,
    pub error: ApplicationError,
}

/// 整书运行报告
#[derive(Debug)]
pub struct BookReport {
    /// 本次运行中完成的章节数（含续跑复用）
    pub completed: usize,
    /// 其中复用已有产物的章节数
    pub resumed: usize,
    /// 终止原因；None 表示全部章节完成
    pub halt: Option<RunHalt>,
    /// 运行结束时的上下文
    pub context: ContextState,
}

impl BookReport {
    pub fn is_complete(&self) -> bool {
        self.halt.is_none()
    }
}

/// 单章推进结果
enum Advance {
    Generated,
    Resumed,
}

/// 存储中某章产物的状态
enum Stored {
    Missing,
    Valid(String),
    /// 未通过校验或内容不可读
    Invalid(String),
}

/// GenerateBook Handler
pub struct GenerateBookHandler {
    chapter_handler: GenerateChapterHandler,
    store: Arc<dyn ArtifactStorePort>,
    generation: Arc<dyn GenerationPort>,
    event_publisher: Arc<EventPublisher>,
    chapter_delay: Duration,
}

impl GenerateBookHandler {
    pub fn new(
        chapter_handler: GenerateChapterHandler,
        store: Arc<dyn ArtifactStorePort>,
        generation: Arc<dyn GenerationPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            chapter_handler,
            store,
            generation,
            event_publisher,
            chapter_delay: Duration::ZERO,
        }
    }

    /// 章节之间的等待时间
    pub fn with_chapter_delay(mut self, delay: Duration) -> Self {
        self.chapter_delay = delay;
        self
    }

    /// 运行整本书
    ///
    /// 传入的上下文通常来自检查点；其中的摘要只用于恢复已完成章节，
    /// 运行过程中会按章节重新累积，保证摘要数等于完成章节数。
    pub async fn handle(&self, command: GenerateBook, mut context: ContextState) -> BookReport {
        let outline = command.outline;
        let restored = context.take_summaries();
        let total = outline.len();

        tracing::info!(
            chapters = total,
            last_chapter = %outline.last_chapter(),
            restored_summaries = restored.len(),
            "Book generation started"
        );

        let mut completed = 0;
        let mut resumed = 0;

        for (index, spec) in outline.chapters().iter().enumerate() {
            let chapter = spec.number();

            match self.advance(&outline, spec, &mut context, &restored).await {
                Ok(Advance::Resumed) => {
                    completed += 1;
                    resumed += 1;
                }
                Ok(Advance::Generated) => {
                    completed += 1;
                    if index + 1 < total && !self.chapter_delay.is_zero() {
                        tokio::time::sleep(self.chapter_delay).await;
                    }
                }
                Err(error) => {
                    tracing::error!(
                        chapter = %chapter,
                        completed = completed,
                        error = %error,
                        "Book generation halted"
                    );
                    self.event_publisher
                        .publish_run_halted(chapter, &error.to_string());
                    return BookReport {
                        completed,
                        resumed,
                        halt: Some(RunHalt { chapter, error }),
                        context,
                    };
                }
            }
        }

        tracing::info!(completed = completed, resumed = resumed, "Book generation finished");
        self.event_publisher.publish_run_finished(completed, resumed);

        BookReport {
            completed,
            resumed,
            halt: None,
            context,
        }
    }

    async fn advance(
        &self,
        outline: &Outline,
        spec: &ChapterSpec,
        context: &mut ContextState,
        restored: &[String],
    ) -> Result<Advance, ApplicationError> {
        let chapter = spec.number();

        self.check_prerequisite(chapter).await?;

        match self.inspect(chapter).await? {
            Stored::Valid(artifact) => {
                // 检查点摘要按章节号对齐，第 n 章对应下标 n-1
                let summary = restored
                    .get(chapter.get() as usize - 1)
                    .cloned()
                    .unwrap_or_else(|| summarize(&artifact));
                context.push_summary(summary);

                tracing::info!(chapter = %chapter, "Chapter already complete, skipping");
                self.event_publisher.publish_chapter_skipped(chapter);
                return Ok(Advance::Resumed);
            }
            Stored::Invalid(issue) => {
                tracing::warn!(
                    chapter = %chapter,
                    issue = %issue,
                    "Existing artifact is invalid, regenerating"
                );
                self.store.remove(chapter).await?;
            }
            Stored::Missing => {}
        }

        tracing::info!(chapter = %chapter, title = %spec.title(), "Generating chapter");
        self.event_publisher
            .publish_chapter_started(chapter, spec.title());

        let seed = SeedContext {
            spec: spec.clone(),
            chapter_context: context.build_chapter_context(chapter, spec.prompt()),
            world_context: context.format_world_context(),
            character_context: context.format_character_context(),
            outline_context: outline.format_outline(),
            last_chapter: outline.last_chapter(),
        };
        log_transition(chapter, ChapterState::NotStarted, ChapterState::ContextPrepared);

        let persisted = match self.chapter_handler.handle(GenerateChapter { seed }).await? {
            ChapterOutcome::Persisted(persisted) => persisted,
            ChapterOutcome::Failed { primary, fallback } => {
                return Err(ApplicationError::FallbackFailed {
                    chapter,
                    primary: Box::new(primary),
                    fallback: Box::new(fallback),
                });
            }
        };

        // 回读确认产物确实可见且有效
        let artifact = match self
            .inspect(chapter)
            .await
            .map_err(|e| ApplicationError::persistence(chapter, e.to_string()))?
        {
            Stored::Valid(artifact) => artifact,
            Stored::Missing => {
                return Err(ApplicationError::persistence(chapter, "artifact missing after publish"))
            }
            Stored::Invalid(issue) => return Err(ApplicationError::persistence(chapter, issue)),
        };

        let directives: Vec<MemoryDirective> = persisted
            .memory_updates
            .iter()
            .flat_map(|block| MemoryDirective::parse_block(block))
            .collect();
        for directive in &directives {
            if let MemoryDirective::ContinuityAlert(alert) = directive {
                tracing::warn!(chapter = %chapter, alert = %alert, "Continuity alert");
            }
            context.apply(directive);
        }

        let summary = summary_from(&directives, &artifact);
        context.push_summary(summary.clone());

        self.generation
            .chapter_complete(&ChapterNotice::completed(chapter))
            .await;
        self.event_publisher
            .publish_chapter_completed(chapter, persisted.pipeline, &summary);

        if let Err(e) = self.store.save_context(context).await {
            tracing::warn!(chapter = %chapter, error = %e, "Failed to checkpoint context");
        }

        tracing::info!(
            chapter = %chapter,
            pipeline = persisted.pipeline,
            directives = directives.len(),
            "Chapter complete"
        );

        Ok(Advance::Generated)
    }

    /// 第 n 章（n>1）要求第 n-1 章产物存在且有效
    async fn check_prerequisite(&self, chapter: ChapterNumber) -> Result<(), ApplicationError> {
        let Some(previous) = chapter.previous() else {
            return Ok(());
        };

        match self.inspect(previous).await? {
            Stored::Valid(_) => Ok(()),
            Stored::Missing | Stored::Invalid(_) => {
                Err(ApplicationError::MissingPrerequisite { chapter, previous })
            }
        }
    }

    /// 读取并校验某章产物，内容不可读视同无效
    async fn inspect(&self, chapter: ChapterNumber) -> Result<Stored, ArtifactStoreError> {
        match self.store.read(chapter).await {
            Ok(None) => Ok(Stored::Missing),
            Ok(Some(content)) => match validate(&content, chapter) {
                Ok(()) => Ok(Stored::Valid(content)),
                Err(issue) => Ok(Stored::Invalid(issue.to_string())),
            },
            Err(ArtifactStoreError::InvalidContent(_, reason)) => Ok(Stored::Invalid(reason)),
            Err(e) => Err(e),
        }
    }
}
