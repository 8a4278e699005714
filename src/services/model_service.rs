use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    /// Ask the provider for a JSON-object reply. Arrays cannot be requested
    /// this way, so array-shaped prompts leave it off.
    pub json_object: bool,
}

impl CompletionRequest {
    pub fn new(system: &str, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            temperature,
            json_object: false,
        }
    }

    pub fn json_object(mut self) -> Self {
        self.json_object = true;
        self
    }
}

/// Language-model collaborator: one prompt in, raw text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;
}

/// OpenAI-compatible chat completions (OpenAI, Groq, local gateways).
pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiCompletionClient {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.llm_api_base.clone())
            .with_api_key(config.llm_api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(openai_config),
            model: config.llm_model.clone(),
            timeout: config.llm_timeout(),
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
        });
        if request.json_object {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let body = self.request_body(&request);

        let response: Value =
            tokio::time::timeout(self.timeout, self.client.chat().create_byot(body)).await??;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AppError::Upstream("completion returned no content".to_string()))
    }
}
