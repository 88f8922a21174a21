use async_trait::async_trait;
use gloo_net::http::Request;
use storechat_core::{ApiError, ChatApi, ChatRequest, ChatResponse};

/// Chat endpoint reached with `fetch` on the page's own origin
pub struct GlooChatApi {
    endpoint: String,
}

impl GlooChatApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait(?Send)]
impl ChatApi for GlooChatApi {
    async fn send_chat_message(&self, message: &str) -> Result<ChatResponse, ApiError> {
        let request = Request::post(&self.endpoint)
            .json(&ChatRequest::new(message))
            .map_err(|e| ApiError::Transport(format!("Failed to serialize request: {:?}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {:?}", e)))?;

        log::debug!("Chat endpoint answered with status {}", response.status());

        // The body carries `error` on 4xx/5xx too, so decode regardless of status
        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ApiError::Decode(format!("Failed to parse response: {:?}", e)))
    }
}
