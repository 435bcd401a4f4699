//! Domain Layer - 领域层
//!
//! 包含:
//! - Book Context: 大纲与章节
//! - Context: 跨章节累积记忆
//! - Session: 多角色会话模型
//! - validator / manuscript: 章节文本校验与排版

pub mod book;
pub mod context;
pub mod manuscript;
pub mod session;
pub mod validator;

pub use validator::{is_valid, validate, ValidationIssue};
