//! Progress Queries - 生成进度查询

use crate::domain::book::Outline;

/// 按大纲检查已有产物
#[derive(Debug, Clone)]
pub struct GetBookProgress {
    pub outline: Outline,
}
