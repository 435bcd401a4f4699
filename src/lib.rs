//! Quire - 多角色分阶段章节生成引擎
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book: 大纲、章节编号、章节规格
//! - Context: 跨章节记忆（摘要、世界元素、角色发展）
//! - Session: 角色、会话记录、带标签的阶段输出
//! - Validator / Manuscript: 产物校验、排版与摘要
//!
//! 应用层 (application/):
//! - Ports: 端口定义（GenerationPort, ArtifactStorePort）
//! - Pipeline: 轮转会话执行器
//! - Commands: 章节生成（回退控制）与整书编排
//! - Queries: 进度查询
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP 生成客户端、脚本客户端、文件产物存储、大纲文件
//! - Memory: 内存产物存储
//! - Events: 进度事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
