//! Participant Roles

use serde::{Deserialize, Serialize};

/// 会话参与者角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// 控制方：发出初始请求并接收输出
    Controller,
    /// 记忆守护者
    MemoryKeeper,
    /// 故事规划
    StoryPlanner,
    /// 初稿写手
    Writer,
    /// 审稿
    Editor,
    /// 终稿写手
    WriterFinal,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Controller => "controller",
            Role::MemoryKeeper => "memory_keeper",
            Role::StoryPlanner => "story_planner",
            Role::Writer => "writer",
            Role::Editor => "editor",
            Role::WriterFinal => "writer_final",
        }
    }

    /// 角色的系统指令（最简版本，措辞不属于引擎契约）
    pub fn instructions(&self) -> &'static str {
        match self {
            Role::Controller => "You coordinate the chapter session.",
            Role::MemoryKeeper => {
                "You are the memory keeper. Track continuity across chapters. \
                 Start with 'MEMORY UPDATE:' and list 'EVENT:', 'CHARACTER: name: development', \
                 'WORLD: name: description' and 'CONTINUITY ALERT:' lines."
            }
            Role::StoryPlanner => {
                "You are the story planner. Produce a short plan for the chapter starting with 'PLAN:'."
            }
            Role::Writer => {
                "You are the writer. Write the chapter text. Start drafts with 'CHAPTER:' \
                 and a finished chapter with 'CHAPTER FINAL:'."
            }
            Role::Editor => {
                "You are the editor. Review the latest draft against the outline and start with 'FEEDBACK:'."
            }
            Role::WriterFinal => {
                "You are the final writer. Revise the draft using the feedback and return the \
                 complete chapter starting with 'CHAPTER FINAL:'."
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
