use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body posted to the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body returned by the chat endpoint: `{"reply": ...}` or `{"error": ...}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    Error(String),
}

impl ChatResponse {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            reply: None,
            error: Some(text.into()),
        }
    }

    /// A non-empty `error` wins over `reply`. `None` when neither is present.
    pub fn into_outcome(self) -> Option<ChatOutcome> {
        match (self.error, self.reply) {
            (Some(error), _) if !error.is_empty() => Some(ChatOutcome::Error(error)),
            (_, Some(reply)) => Some(ChatOutcome::Reply(reply)),
            _ => None,
        }
    }
}

/// The remote chat endpoint
#[async_trait(?Send)]
pub trait ChatApi {
    async fn send_chat_message(&self, message: &str) -> Result<ChatResponse, ApiError>;
}
