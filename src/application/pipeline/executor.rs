//! Stage Pipeline Executor
//!
//! 单线程顺序执行的轮转会话：
//! - 一轮 = 每个参与者按顺序最多发言一次
//! - 每个参与者以截至当前的完整会话记录为唯一输入
//! - 最后一个参与者（终结者）输出终稿时结束；轮次用尽则为 IncompleteSession
//! - 任一生成调用出错或超时立即中止整个会话

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::ApplicationError;
use crate::application::ports::{GenerationPort, GenerationRequest};
use crate::domain::book::ChapterNumber;
use crate::domain::session::{Message, Role, StageKind, StageOutput, Transcript};

/// 主流程默认轮次上限
pub const PRIMARY_MAX_ROUNDS: u32 = 5;
/// 回退流程默认轮次上限
pub const FALLBACK_MAX_ROUNDS: u32 = 3;

/// 会话参与者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    pub role: Role,
    /// 输出无标签时按此阶段处理
    pub expects: StageKind,
}

impl Participant {
    pub fn new(role: Role, expects: StageKind) -> Self {
        Self { role, expects }
    }
}

/// 流程参数：有序参与者列表 + 轮次上限
#[derive(Debug, Clone)]
pub struct PipelineParams {
    pub name: &'static str,
    pub participants: Vec<Participant>,
    pub max_rounds: u32,
}

impl PipelineParams {
    /// 主流程：记忆 → 初稿 → 审稿 → 终稿
    pub fn primary() -> Self {
        Self {
            name: "primary",
            participants: vec![
                Participant::new(Role::MemoryKeeper, StageKind::MemoryUpdate),
                Participant::new(Role::Writer, StageKind::Draft),
                Participant::new(Role::Editor, StageKind::Feedback),
                Participant::new(Role::WriterFinal, StageKind::Final),
            ],
            max_rounds: PRIMARY_MAX_ROUNDS,
        }
    }

    /// 回退流程：规划 → 写作
    pub fn fallback() -> Self {
        Self {
            name: "fallback",
            participants: vec![
                Participant::new(Role::StoryPlanner, StageKind::Plan),
                Participant::new(Role::Writer, StageKind::Final),
            ],
            max_rounds: FALLBACK_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

/// 会话结果
#[derive(Debug, Clone)]
pub struct SessionOutput {
    /// 终结者最后一条消息（去掉标签）
    pub final_text: String,
    /// 会话中所有记忆更新块
    pub memory_updates: Vec<String>,
    /// 实际执行的轮次
    pub rounds: u32,
    /// 会话记录中的消息总数（含种子）
    pub messages: usize,
}

/// 流程执行器
pub struct StagePipelineExecutor {
    generation: Arc<dyn GenerationPort>,
    call_timeout: Duration,
}

impl StagePipelineExecutor {
    pub fn new(generation: Arc<dyn GenerationPort>, call_timeout: Duration) -> Self {
        Self {
            generation,
            call_timeout,
        }
    }

    /// 执行一次会话
    pub async fn run_session(
        &self,
        params: &PipelineParams,
        seed: Vec<Message>,
        chapter: ChapterNumber,
    ) -> Result<SessionOutput, ApplicationError> {
        let terminal = params.participants.len().checked_sub(1);
        let Some(terminal) = terminal else {
            tracing::warn!(chapter = %chapter, pipeline = params.name, "Pipeline has no participants");
            return Err(ApplicationError::IncompleteSession { chapter, rounds: 0 });
        };

        let mut transcript = Transcript::new(seed);
        let mut memory_updates = Vec::new();

        for round in 1..=params.max_rounds {
            for (index, participant) in params.participants.iter().enumerate() {
                let raw = self.invoke(participant.role, &transcript, chapter).await?;
                let output = StageOutput::parse(&raw, participant.expects);

                tracing::debug!(
                    chapter = %chapter,
                    pipeline = params.name,
                    round = round,
                    role = %participant.role,
                    stage = %output.kind,
                    tagged = output.tagged,
                    len = raw.len(),
                    "Participant responded"
                );

                transcript.push(Message::new(participant.role, raw));

                if output.kind == StageKind::MemoryUpdate {
                    memory_updates.push(output.payload);
                    continue;
                }

                if index == terminal && output.is_final() {
                    tracing::info!(
                        chapter = %chapter,
                        pipeline = params.name,
                        rounds = round,
                        messages = transcript.len(),
                        "Session produced final chapter"
                    );
                    return Ok(SessionOutput {
                        final_text: output.payload,
                        memory_updates,
                        rounds: round,
                        messages: transcript.len(),
                    });
                }
            }
        }

        Err(ApplicationError::IncompleteSession {
            chapter,
            rounds: params.max_rounds,
        })
    }

    /// 单次阻塞生成调用，带超时
    async fn invoke(
        &self,
        role: Role,
        transcript: &Transcript,
        chapter: ChapterNumber,
    ) -> Result<String, ApplicationError> {
        let request = GenerationRequest {
            role,
            transcript: transcript.messages(),
            chapter,
        };

        match tokio::time::timeout(self.call_timeout, self.generation.generate(request)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ApplicationError::generation(chapter, role, e.to_string())),
            Err(_) => Err(ApplicationError::generation(
                chapter,
                role,
                format!("timed out after {:?}", self.call_timeout),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::GenerationError;
    use crate::infrastructure::adapters::ScriptedGenerationClient;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ch(n: u32) -> ChapterNumber {
        ChapterNumber::new(n).unwrap()
    }

    fn seed() -> Vec<Message> {
        vec![
            Message::new(Role::Controller, "Complete Book Outline:"),
            Message::new(Role::Controller, "Write chapter 1"),
        ]
    }

    fn executor(client: Arc<ScriptedGenerationClient>) -> StagePipelineExecutor {
        StagePipelineExecutor::new(client, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_primary_session_completes_in_one_round() {
        let client = Arc::new(ScriptedGenerationClient::well_behaved());
        let output = executor(client.clone())
            .run_session(&PipelineParams::primary(), seed(), ch(1))
            .await
            .unwrap();

        assert_eq!(output.rounds, 1);
        assert_eq!(output.messages, 6);
        assert!(output.final_text.starts_with("Chapter 1"));
        assert_eq!(output.memory_updates.len(), 1);

        let roles: Vec<Role> = client.calls().iter().map(|c| c.role).collect();
        assert_eq!(
            roles,
            vec![Role::MemoryKeeper, Role::Writer, Role::Editor, Role::WriterFinal]
        );
    }

    #[tokio::test]
    async fn test_each_participant_sees_full_transcript() {
        let client = Arc::new(ScriptedGenerationClient::well_behaved());
        executor(client.clone())
            .run_session(&PipelineParams::primary(), seed(), ch(1))
            .await
            .unwrap();

        let lens: Vec<usize> = client.calls().iter().map(|c| c.transcript_len).collect();
        assert_eq!(lens, vec![2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_round_cap_without_final_is_incomplete() {
        let client = Arc::new(ScriptedGenerationClient::new(|request| {
            Ok(match request.role {
                Role::StoryPlanner => "PLAN: keep going".to_string(),
                _ => "FEEDBACK: not done yet".to_string(),
            })
        }));

        let result = executor(client.clone())
            .run_session(&PipelineParams::fallback(), seed(), ch(2))
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::IncompleteSession { rounds: 3, .. })
        ));
        assert_eq!(client.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_generation_error_aborts_session() {
        let client = Arc::new(ScriptedGenerationClient::new(|request| match request.role {
            Role::Editor => Err(GenerationError::ServiceError("HTTP 500".to_string())),
            _ => Ok(ScriptedGenerationClient::canned_response(request)),
        }));

        let result = executor(client.clone())
            .run_session(&PipelineParams::primary(), seed(), ch(1))
            .await;

        match result {
            Err(ApplicationError::GenerationFailure { role, reason, .. }) => {
                assert_eq!(role, Role::Editor);
                assert!(reason.contains("HTTP 500"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(client.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_timeout_is_generation_failure() {
        let client = Arc::new(
            ScriptedGenerationClient::well_behaved().with_latency(Duration::from_millis(500)),
        );
        let executor = StagePipelineExecutor::new(client, Duration::from_millis(20));

        let result = executor
            .run_session(&PipelineParams::primary(), seed(), ch(1))
            .await;

        match result {
            Err(ApplicationError::GenerationFailure { role, reason, .. }) => {
                assert_eq!(role, Role::MemoryKeeper);
                assert!(reason.contains("timed out"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_final_from_non_terminal_does_not_end_session() {
        let client = Arc::new(ScriptedGenerationClient::new(|request| {
            Ok(match request.role {
                Role::StoryPlanner => "CHAPTER FINAL:\nChapter 1\nToo early\nStill early".to_string(),
                _ => "FEEDBACK: writer refuses".to_string(),
            })
        }));

        let result = executor(client)
            .run_session(&PipelineParams::fallback().with_max_rounds(2), seed(), ch(1))
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::IncompleteSession { rounds: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_terminal_final_in_later_round() {
        let final_calls = Arc::new(AtomicUsize::new(0));
        let counter = final_calls.clone();
        let client = Arc::new(ScriptedGenerationClient::new(move |request| {
            if request.role == Role::WriterFinal && counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Ok("CHAPTER:\nChapter 1\nNot finished".to_string());
            }
            Ok(ScriptedGenerationClient::canned_response(request))
        }));

        let output = executor(client.clone())
            .run_session(&PipelineParams::primary(), seed(), ch(1))
            .await
            .unwrap();

        assert_eq!(output.rounds, 2);
        assert_eq!(client.calls().len(), 8);
        assert_eq!(output.memory_updates.len(), 2);
        assert_eq!(final_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_pipeline_is_incomplete_without_calls() {
        let client = Arc::new(ScriptedGenerationClient::well_behaved());
        let params = PipelineParams {
            name: "empty",
            participants: vec![],
            max_rounds: 5,
        };

        let result = executor(client.clone()).run_session(&params, seed(), ch(1)).await;
        assert!(matches!(
            result,
            Err(ApplicationError::IncompleteSession { rounds: 0, .. })
        ));
        assert!(client.calls().is_empty());
    }
}
