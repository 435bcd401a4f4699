//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - 章节编号与产物寻址
//! - 章节规格（标题 + 要求）
//! - 大纲聚合（编号唯一、按升序处理）

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Outline;
pub use entities::ChapterSpec;
pub use errors::BookError;
pub use value_objects::{ArtifactKey, ChapterNumber};
