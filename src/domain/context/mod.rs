//! Context - 跨章节累积记忆
//!
//! - ContextState: 章节摘要、世界元素、角色发展
//! - MemoryDirective: 记忆守护者输出中解析出的更新指令

mod directives;
mod state;

pub use directives::MemoryDirective;
pub use state::{ContextState, NO_CHARACTERS_SENTINEL, NO_WORLD_ELEMENTS_SENTINEL};
