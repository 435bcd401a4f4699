//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：生成进度

mod progress_queries;

pub mod handlers;

pub use progress_queries::*;
