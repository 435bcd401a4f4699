//! Session - 单章多角色会话的领域模型
//!
//! - Role: 参与者角色
//! - Message / Transcript: 会话记录
//! - StageOutput: 带标签的阶段输出

mod message;
mod role;
mod stage;

pub use message::{Message, Transcript};
pub use role::Role;
pub use stage::{StageKind, StageOutput};
