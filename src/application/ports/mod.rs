//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod generation;

pub use artifact_store::{ArtifactStoreError, ArtifactStorePort};
pub use generation::{ChapterNotice, GenerationError, GenerationPort, GenerationRequest};
