use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("LLM transport error: {0}")]
    Network(String),

    #[error("LLM API error (HTTP {status})")]
    Api { status: u16, body: String },
}

impl ChatError {
    /// Raw collaborator error payload, when one exists. Returned to clients
    /// as the `details` field of the failure envelope.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ChatError::Api { body, .. } => Some(
                serde_json::from_str(body)
                    .unwrap_or_else(|_| serde_json::Value::String(body.clone())),
            ),
            ChatError::Network(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Wire request for an OpenAI-compatible chat completion. `stream` is always
/// false: streaming is unsupported and never decoded.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

/// A well-formed non-streaming completion: at least one choice, plus the
/// usage block passed through opaquely.
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
}

/// Outcome of decoding the collaborator's response body, decided once at the
/// provider boundary. Anything that is not a completion with choices (a
/// would-be stream included) is `Unrecognized` and handled downstream as a
/// missing reply, not an error.
#[derive(Debug)]
pub enum CompletionOutcome {
    Completion(ChatCompletion),
    Unrecognized,
}

pub(crate) fn decode_completion(body: serde_json::Value) -> CompletionOutcome {
    match serde_json::from_value::<ChatCompletion>(body) {
        Ok(completion) if !completion.choices.is_empty() => {
            CompletionOutcome::Completion(completion)
        }
        _ => CompletionOutcome::Unrecognized,
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionOutcome, ChatError>;
}
