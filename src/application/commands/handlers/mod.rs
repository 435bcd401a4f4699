//! Command Handlers 实现
//!
//! - GenerateChapterHandler: 主流程 + 回退控制
//! - GenerateBookHandler: 按顺序驱动全部章节

mod book_handlers;
mod chapter_handlers;

pub use book_handlers::*;
pub use chapter_handlers::*;
