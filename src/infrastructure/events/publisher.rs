//! Event Publisher Implementation
//!
//! 书籍生成进度事件推送，宿主通过 subscribe() 接收

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::book::ChapterNumber;

/// 进度事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum BookEvent {
    /// 章节开始生成
    ChapterStarted { chapter: ChapterNumber, title: String },
    /// 主流程失败，进入回退流程
    FallbackStarted { chapter: ChapterNumber, reason: String },
    /// 章节已持久化并确认
    ChapterCompleted {
        chapter: ChapterNumber,
        pipeline: String,
        summary: String,
    },
    /// 章节已存在且有效，跳过生成
    ChapterSkipped { chapter: ChapterNumber },
    /// 运行终止
    RunHalted { chapter: ChapterNumber, reason: String },
    /// 运行结束（全部章节完成）
    RunFinished { completed: usize, resumed: usize },
}

/// 事件信封
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    pub run_id: Uuid,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: BookEvent,
}

/// 事件发布器
pub struct EventPublisher {
    run_id: Uuid,
    channel: broadcast::Sender<EventEnvelope>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            run_id: Uuid::new_v4(),
            channel: tx,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// 订阅进度事件
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.channel.subscribe()
    }

    pub fn publish_chapter_started(&self, chapter: ChapterNumber, title: &str) {
        self.publish(BookEvent::ChapterStarted {
            chapter,
            title: title.to_string(),
        });
    }

    pub fn publish_fallback_started(&self, chapter: ChapterNumber, reason: &str) {
        self.publish(BookEvent::FallbackStarted {
            chapter,
            reason: reason.to_string(),
        });
    }

    pub fn publish_chapter_completed(&self, chapter: ChapterNumber, pipeline: &str, summary: &str) {
        self.publish(BookEvent::ChapterCompleted {
            chapter,
            pipeline: pipeline.to_string(),
            summary: summary.to_string(),
        });
    }

    pub fn publish_chapter_skipped(&self, chapter: ChapterNumber) {
        self.publish(BookEvent::ChapterSkipped { chapter });
    }

    pub fn publish_run_halted(&self, chapter: ChapterNumber, reason: &str) {
        self.publish(BookEvent::RunHalted {
            chapter,
            reason: reason.to_string(),
        });
    }

    pub fn publish_run_finished(&self, completed: usize, resumed: usize) {
        self.publish(BookEvent::RunFinished { completed, resumed });
    }

    fn publish(&self, event: BookEvent) {
        let envelope = EventEnvelope {
            run_id: self.run_id,
            at: Utc::now(),
            event,
        };
        if let Err(e) = self.channel.send(envelope) {
            tracing::debug!(
                run_id = %self.run_id,
                error = %e,
                "Failed to publish event (no receivers)"
            );
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();
        let chapter = ChapterNumber::new(1).unwrap();

        publisher.publish_chapter_started(chapter, "One");
        publisher.publish_chapter_completed(chapter, "primary", "summary");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.run_id, publisher.run_id());
        assert!(matches!(first.event, BookEvent::ChapterStarted { .. }));
        assert!(matches!(rx.recv().await.unwrap().event, BookEvent::ChapterCompleted { .. }));
    }

    #[test]
    fn test_publish_without_subscribers_is_harmless() {
        let publisher = EventPublisher::new();
        publisher.publish_chapter_skipped(ChapterNumber::new(2).unwrap());
    }

    #[test]
    fn test_event_serialization() {
        let envelope = EventEnvelope {
            run_id: Uuid::nil(),
            at: Utc::now(),
            event: BookEvent::ChapterSkipped {
                chapter: ChapterNumber::new(2).unwrap(),
            },
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["event"], "ChapterSkipped");
        assert_eq!(json["data"]["chapter"], 2);
    }
}
