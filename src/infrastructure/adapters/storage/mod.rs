//! Storage Adapter - 文件系统章节产物存储

mod file_artifact_store;

pub use file_artifact_store::FileArtifactStore;
