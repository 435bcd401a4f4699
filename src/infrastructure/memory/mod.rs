//! Memory Layer - In-Memory State Management
//!
//! 实现内存版产物存储，用于测试和演练

mod artifact_store;

pub use artifact_store::InMemoryArtifactStore;
