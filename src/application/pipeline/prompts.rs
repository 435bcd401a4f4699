//! Session Seed - 控制方发出的初始请求

use crate::domain::book::{ChapterNumber, ChapterSpec};
use crate::domain::session::{Message, Role};

use super::PipelineParams;

/// 会话种子上下文，主流程与回退流程使用同一份
#[derive(Debug, Clone)]
pub struct SeedContext {
    pub spec: ChapterSpec,
    /// ContextState::build_chapter_context 的结果
    pub chapter_context: String,
    pub world_context: String,
    pub character_context: String,
    pub outline_context: String,
    pub last_chapter: ChapterNumber,
}

/// 构建会话初始记录：完整大纲 + 当前章节请求
pub fn build_seed(context: &SeedContext, params: &PipelineParams) -> Vec<Message> {
    let number = context.spec.number();

    let sequence = params
        .participants
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {} ({})", i + 1, p.role, p.expects))
        .collect::<Vec<_>>()
        .join("\n");

    let request = format!(
        "IMPORTANT: This is Chapter {number}. Do not proceed to the next chapter until explicitly instructed.\n\
         DO NOT END THE STORY HERE unless this is actually the final chapter ({last}).\n\n\
         Current Task: Generate Chapter {number} content only.\n\n\
         Chapter Outline:\nTitle: {title}\n\n\
         Chapter Requirements:\n{prompt}\n\n\
         Previous Context for Reference:\n{chapter_context}\n\n\
         {world}\n\n{characters}\n\n\
         Follow this exact sequence for Chapter {number} only ({pipeline} pipeline):\n{sequence}",
        number = number,
        last = context.last_chapter,
        title = context.spec.title(),
        prompt = context.spec.prompt(),
        chapter_context = context.chapter_context,
        world = context.world_context,
        characters = context.character_context,
        pipeline = params.name,
        sequence = sequence,
    );

    vec![
        Message::new(Role::Controller, context.outline_context.clone()),
        Message::new(Role::Controller, request),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> SeedContext {
        SeedContext {
            spec: ChapterSpec::new(2, "The Crossing", "Dane crosses the river").unwrap(),
            chapter_context: "Previous Chapter Summaries:\nChapter 1: Dane arrives".to_string(),
            world_context: "Established World Elements:\n- River: cold".to_string(),
            character_context: "No character developments tracked yet.".to_string(),
            outline_context: "Complete Book Outline:".to_string(),
            last_chapter: ChapterNumber::new(5).unwrap(),
        }
    }

    #[test]
    fn test_seed_contains_context_and_sequence() {
        let seed = build_seed(&context(), &PipelineParams::primary());
        assert_eq!(seed.len(), 2);
        assert!(seed.iter().all(|m| m.role == Role::Controller));
        assert_eq!(seed[0].text, "Complete Book Outline:");

        let request = &seed[1].text;
        assert!(request.contains("This is Chapter 2."));
        assert!(request.contains("final chapter (5)"));
        assert!(request.contains("Chapter 1: Dane arrives"));
        assert!(request.contains("- River: cold"));
        assert!(request.contains("1. memory_keeper (memory_update)"));
        assert!(request.contains("4. writer_final (final)"));
    }

    #[test]
    fn test_fallback_seed_lists_reduced_sequence() {
        let seed = build_seed(&context(), &PipelineParams::fallback());
        let request = &seed[1].text;
        assert!(request.contains("1. story_planner (plan)"));
        assert!(request.contains("2. writer (final)"));
        assert!(!request.contains("editor"));
    }
}
