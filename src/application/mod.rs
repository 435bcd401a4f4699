//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（GenerationPort、ArtifactStorePort）
//! - pipeline: 轮转会话执行器与会话种子
//! - commands: 章节生成命令及处理器（回退控制、顺序编排）
//! - queries: 进度查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        BookReport, ChapterOutcome, GenerateBookHandler, GenerateChapterHandler, PersistedChapter,
        RunHalt,
    },
    ChapterState, GenerateBook, GenerateChapter,
};

pub use error::ApplicationError;

pub use pipeline::{
    build_seed, Participant, PipelineParams, SeedContext, SessionOutput, StagePipelineExecutor,
};

pub use ports::{
    ArtifactStoreError, ArtifactStorePort, ChapterNotice, GenerationError, GenerationPort,
    GenerationRequest,
};

pub use queries::{
    handlers::{ArtifactStatus, BookProgressResponse, GetBookProgressHandler},
    GetBookProgress,
};
