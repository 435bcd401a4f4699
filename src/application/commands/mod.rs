//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：章节生成与整书编排

mod book_commands;

pub mod handlers;

pub use book_commands::*;
