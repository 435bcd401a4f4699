//! HTTP Generation Client - 调用 OpenAI 兼容的对话补全服务
//!
//! 实现 GenerationPort trait
//!
//! 外部 API:
//! POST {base_url}/chat/completions
//! Request: {"model": "...", "messages": [...], "temperature": 0.7}  (JSON)
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{GenerationError, GenerationPort, GenerationRequest};
use crate::domain::session::{Message, Role};

/// 对话消息
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// 对话补全请求体
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP 生成客户端配置
#[derive(Debug, Clone)]
pub struct HttpGenerationClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// API Key
    pub api_key: Option<String>,
    /// 采样温度
    pub temperature: f32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpGenerationClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com/v1".to_string(),
            model: "deepseek-chat".to_string(),
            api_key: None,
            temperature: 0.7,
            timeout_secs: 600,
        }
    }
}

impl HttpGenerationClientConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 生成客户端
pub struct HttpGenerationClient {
    client: Client,
    config: HttpGenerationClientConfig,
}

impl HttpGenerationClient {
    pub fn new(config: HttpGenerationClientConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// 把会话记录映射为对话消息：本角色的发言为 assistant，其余为带发言者前缀的 user
    fn to_chat_messages(role: Role, transcript: &[Message]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: role.instructions().to_string(),
        });

        for message in transcript {
            if message.role == role {
                messages.push(ChatMessage {
                    role: "assistant",
                    content: message.text.clone(),
                });
            } else {
                messages.push(ChatMessage {
                    role: "user",
                    content: format!("[{}]\n{}", message.role, message.text),
                });
            }
        }

        messages
    }
}

#[async_trait]
impl GenerationPort for HttpGenerationClient {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: Self::to_chat_messages(request.role, request.transcript),
            temperature: self.config.temperature,
        };

        tracing::debug!(
            url = %self.completions_url(),
            chapter = %request.chapter,
            role = %request.role,
            messages = body.messages.len(),
            "Sending chat completion request"
        );

        let mut builder = self.client.post(self.completions_url()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else if e.is_connect() {
                GenerationError::NetworkError(format!("Cannot connect to generation service: {}", e))
            } else {
                GenerationError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::InvalidResponse(format!("Failed to decode completion: {}", e))
            }
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::InvalidResponse("Empty completion".to_string()))?;

        tracing::info!(
            chapter = %request.chapter,
            role = %request.role,
            len = content.len(),
            "Generation completed"
        );

        Ok(content)
    }
}
