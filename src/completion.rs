use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time::{timeout, Duration};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl Completion {
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: texts
                .into_iter()
                .map(|text| CompletionChoice {
                    message: Some(ChoiceMessage {
                        content: Some(text.into()),
                    }),
                })
                .collect(),
        }
    }

    /// Text of the first choice, if it has any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .filter(|content| !content.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    /// The service answered with a non-success status and a body worth
    /// relaying.
    #[error("completion service returned {status}: {body}")]
    Upstream { status: StatusCode, body: Value },
    #[error("failed to reach completion service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode completion response: {0}")]
    Decode(String),
    #[error("completion request timed out")]
    Timeout,
}

/// Prompt in, choices out. Keeps the handler independent of the vendor API.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

impl<'a> From<&'a CompletionRequest> for ChatCompletionBody<'a> {
    fn from(req: &'a CompletionRequest) -> Self {
        Self {
            model: &req.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &req.system,
                },
                ChatMessage {
                    role: "user",
                    content: &req.user,
                },
            ],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        }
    }
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiCompletionService {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_ms: Option<u64>,
}

impl OpenAiCompletionService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: crate::config::DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.openai_api_key.as_ref()?;
        Some(
            Self::new(api_key.clone())
                .with_base_url(config.openai_base_url.clone())
                .with_timeout_ms(config.timeout_ms),
        )
    }

    async fn send(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatCompletionBody::from(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let body = serde_json::from_str::<Value>(&text)
                .unwrap_or_else(|_| json!({ "error": { "message": text } }));
            let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            return Err(CompletionError::Upstream { status, body });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| CompletionError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        tracing::debug!(
            model = %request.model,
            prompt_len = request.user.len(),
            "sending chat completion request"
        );

        match self.timeout_ms {
            Some(ms) => timeout(Duration::from_millis(ms), self.send(request))
                .await
                .map_err(|_| CompletionError::Timeout)?,
            None => self.send(request).await,
        }
    }
}
