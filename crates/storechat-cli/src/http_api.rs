use async_trait::async_trait;
use std::time::Duration;
use storechat_core::{ApiError, ChatApi, ChatRequest, ChatResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat endpoint reached over HTTP with reqwest
pub struct HttpChatApi {
    url: String,
    client: reqwest::Client,
}

impl HttpChatApi {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait(?Send)]
impl ChatApi for HttpChatApi {
    async fn send_chat_message(&self, message: &str) -> Result<ChatResponse, ApiError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&ChatRequest::new(message))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        log::debug!("Chat endpoint answered with status {}", status);

        // {"error": ...} bodies also arrive with 4xx/5xx statuses
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("status {}: {}", status, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reply_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .and(body_json(serde_json::json!({"message": "hello"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"reply": "hi there"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpChatApi::new(format!("{}/api/chat/", server.uri()));
        let response = api.send_chat_message("hello").await.unwrap();

        assert_eq!(response, ChatResponse::reply("hi there"));
    }

    #[tokio::test]
    async fn test_error_payload_on_bad_request_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "Mensagem vazia"})),
            )
            .mount(&server)
            .await;

        let api = HttpChatApi::new(format!("{}/api/chat/", server.uri()));
        let response = api.send_chat_message(" ").await.unwrap();

        assert_eq!(response, ChatResponse::error("Mensagem vazia"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let api = HttpChatApi::new(format!("{}/api/chat/", server.uri()));
        let result = api.send_chat_message("hello").await;

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_transport_error() {
        let api = HttpChatApi::new("http://127.0.0.1:9/api/chat/");
        let result = api.send_chat_message("hello").await;

        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
