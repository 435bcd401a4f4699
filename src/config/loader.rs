//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（quire.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["quire", "quire.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `QUIRE_`，层级分隔符 `__`）
/// 2. 配置文件（quire.toml 或 quire.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `QUIRE_GENERATION__BASE_URL=http://localhost:11434/v1`
/// - `QUIRE_GENERATION__API_KEY=sk-...`
/// - `QUIRE_PIPELINE__PRIMARY_MAX_ROUNDS=6`
/// - `QUIRE_STORAGE__OUTPUT_DIR=/data/book`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("generation.base_url", "https://api.deepseek.com/v1")?
        .set_default("generation.model", "deepseek-chat")?
        .set_default("generation.temperature", 0.7)?
        .set_default("generation.timeout_secs", 600)?
        .set_default("pipeline.primary_max_rounds", 5)?
        .set_default("pipeline.fallback_max_rounds", 3)?
        .set_default("pipeline.chapter_delay_secs", 5)?
        .set_default("storage.output_dir", "book_output")?
        .set_default("outline.path", "outline.json")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: QUIRE_GENERATION__MODEL=deepseek-reasoner
    builder = builder.add_source(
        Environment::with_prefix("QUIRE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.generation.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Generation base URL cannot be empty".to_string(),
        ));
    }

    if config.generation.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Generation model cannot be empty".to_string(),
        ));
    }

    if config.generation.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Generation timeout cannot be 0".to_string(),
        ));
    }

    if config.pipeline.primary_max_rounds == 0 || config.pipeline.fallback_max_rounds == 0 {
        return Err(ConfigError::ValidationError(
            "Pipeline round caps must be at least 1".to_string(),
        ));
    }

    if config.storage.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Generation URL: {}", config.generation.base_url);
    tracing::info!("Generation Model: {}", config.generation.model);
    tracing::info!("API Key: {}", config.generation.masked_api_key());
    tracing::info!("Call Timeout: {}s", config.generation.timeout_secs);
    tracing::info!(
        "Round Caps: primary={} fallback={}",
        config.pipeline.primary_max_rounds,
        config.pipeline.fallback_max_rounds
    );
    tracing::info!("Chapter Delay: {}s", config.pipeline.chapter_delay_secs);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Outline: {:?}", config.outline.path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_rounds() {
        let mut config = AppConfig::default();
        config.pipeline.fallback_max_rounds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_model() {
        let mut config = AppConfig::default();
        config.generation.model = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.generation.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[generation]\nmodel = \"llama3\"\n\n[pipeline]\nprimary_max_rounds = 2\n\n[storage]\noutput_dir = \"out\""
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.generation.model, "llama3");
        assert_eq!(config.generation.base_url, "https://api.deepseek.com/v1");
        assert_eq!(config.pipeline.primary_max_rounds, 2);
        assert_eq!(config.pipeline.fallback_max_rounds, 3);
        assert_eq!(config.storage.output_dir, std::path::PathBuf::from("out"));
    }
}
