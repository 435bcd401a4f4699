//! Quire - 多角色分阶段章节生成引擎
//!
//! 用法: quire [config.toml]
//!
//! 按大纲顺序生成全部章节；输出目录中已有的有效章节会被复用。

use std::path::PathBuf;
use std::sync::Arc;

use quire::application::{
    GenerateBook, GenerateBookHandler, GenerateChapterHandler, GetBookProgress,
    GetBookProgressHandler, StagePipelineExecutor,
};
use quire::application::ports::ArtifactStorePort;
use quire::config::{load_config, load_config_from_path, print_config, AppConfig};
use quire::domain::context::ContextState;
use quire::infrastructure::adapters::{load_outline, FileArtifactStore, HttpGenerationClient};
use quire::infrastructure::events::EventPublisher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => load_config_from_path(Some(&path)),
        None => load_config(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Quire - 多角色分阶段章节生成引擎");
    print_config(&config);

    let outline = load_outline(&config.outline.path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load outline {:?}: {}", config.outline.path, e))?;

    // 产物存储与上下文检查点
    let store = Arc::new(FileArtifactStore::new(&config.storage.output_dir).await?);
    let checkpoint = store.load_context().await?.unwrap_or_else(ContextState::new);

    let progress = GetBookProgressHandler::new(store.clone())
        .handle(GetBookProgress {
            outline: outline.clone(),
        })
        .await?;
    tracing::info!(
        chapters = outline.len(),
        resumable = progress.resumable(),
        next = ?progress.next_chapter().map(|c| c.get()),
        "Outline loaded"
    );
    for (chapter, status) in &progress.chapters {
        tracing::debug!(chapter = %chapter, status = status.as_str(), "Artifact status");
    }

    // 生成客户端
    let generation = Arc::new(HttpGenerationClient::new(config.generation.client_config())?);

    // 事件发布器，事件写入日志
    let event_publisher = Arc::new(EventPublisher::new());
    let mut events = event_publisher.subscribe();
    tokio::spawn(async move {
        while let Ok(envelope) = events.recv().await {
            match serde_json::to_string(&envelope) {
                Ok(json) => tracing::debug!(event = %json, "Progress event"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize event"),
            }
        }
    });

    let executor = Arc::new(StagePipelineExecutor::new(
        generation.clone(),
        config.generation.call_timeout(),
    ));
    let chapter_handler =
        GenerateChapterHandler::new(executor, store.clone(), event_publisher.clone())
            .with_pipelines(config.pipeline.primary(), config.pipeline.fallback());
    let book_handler =
        GenerateBookHandler::new(chapter_handler, store.clone(), generation, event_publisher)
            .with_chapter_delay(config.pipeline.chapter_delay());

    let report = book_handler.handle(GenerateBook { outline }, checkpoint).await;

    match report.halt {
        None => {
            tracing::info!(
                completed = report.completed,
                resumed = report.resumed,
                output_dir = %store.base_dir().display(),
                "Book generation complete"
            );
            Ok(())
        }
        Some(halt) => Err(anyhow::anyhow!(
            "Generation halted at chapter {}: {}",
            halt.chapter,
            halt.error
        )),
    }
}

/// 初始化日志（RUST_LOG 优先）
fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},quire={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
