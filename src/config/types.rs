//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::pipeline::{PipelineParams, FALLBACK_MAX_ROUNDS, PRIMARY_MAX_ROUNDS};
use crate::infrastructure::adapters::HttpGenerationClientConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 生成服务配置
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 流程配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 大纲配置
    #[serde(default)]
    pub outline: OutlineConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 生成服务配置（OpenAI 兼容接口）
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 服务基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// API Key，建议通过 QUIRE_GENERATION__API_KEY 设置
    #[serde(default)]
    pub api_key: Option<String>,

    /// 采样温度
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// 单次调用超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    600
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
        }
    }
}

impl GenerationConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 转换为 HTTP 客户端配置
    pub fn client_config(&self) -> HttpGenerationClientConfig {
        HttpGenerationClientConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        }
    }

    /// 打印用，隐藏 API Key
    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            None | Some("") => "<unset>".to_string(),
            Some(key) if key.chars().count() <= 4 => "****".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("****{}", tail)
            }
        }
    }
}

/// 流程配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// 主流程轮次上限
    #[serde(default = "default_primary_rounds")]
    pub primary_max_rounds: u32,

    /// 回退流程轮次上限
    #[serde(default = "default_fallback_rounds")]
    pub fallback_max_rounds: u32,

    /// 章节之间的等待时间（秒）
    #[serde(default = "default_chapter_delay")]
    pub chapter_delay_secs: u64,
}

fn default_primary_rounds() -> u32 {
    PRIMARY_MAX_ROUNDS
}

fn default_fallback_rounds() -> u32 {
    FALLBACK_MAX_ROUNDS
}

fn default_chapter_delay() -> u64 {
    5
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            primary_max_rounds: default_primary_rounds(),
            fallback_max_rounds: default_fallback_rounds(),
            chapter_delay_secs: default_chapter_delay(),
        }
    }
}

impl PipelineConfig {
    pub fn primary(&self) -> PipelineParams {
        PipelineParams::primary().with_max_rounds(self.primary_max_rounds)
    }

    pub fn fallback(&self) -> PipelineParams {
        PipelineParams::fallback().with_max_rounds(self.fallback_max_rounds)
    }

    pub fn chapter_delay(&self) -> Duration {
        Duration::from_secs(self.chapter_delay_secs)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 章节产物目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("book_output")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// 大纲配置
#[derive(Debug, Clone, Deserialize)]
pub struct OutlineConfig {
    /// 大纲文件路径（.json 或 .toml）
    #[serde(default = "default_outline_path")]
    pub path: PathBuf,
}

fn default_outline_path() -> PathBuf {
    PathBuf::from("outline.json")
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            path: default_outline_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
