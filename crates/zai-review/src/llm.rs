use serde::{Deserialize, Serialize};
use zai_review_core::{LlmConfig, ReviewError};

use crate::prompt::SYSTEM_PROMPT;

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use zai_review::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage::new(Role::User, "Review this code");
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use zai_review::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// Body of a chat-completion request.
///
/// # Examples
///
/// ```
/// use zai_review::llm::ChatRequest;
///
/// let request = ChatRequest::review("glm-4.7", "diff goes here");
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json["model"], "glm-4.7");
/// assert_eq!(json["messages"][0]["role"], "system");
/// assert_eq!(json["messages"][1]["content"], "diff goes here");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation sent to the model.
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// A review request: the fixed reviewer instruction followed by `prompt`.
    pub fn review(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage::new(Role::System, SYSTEM_PROMPT),
                ChatMessage::new(Role::User, prompt),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the Z.ai chat-completions endpoint.
///
/// Sends exactly one request per call. No timeout, retry, or streaming: the
/// whole response body is buffered before it is parsed.
///
/// # Examples
///
/// ```
/// use zai_review_core::LlmConfig;
/// use zai_review::llm::LlmClient;
///
/// let client = LlmClient::new(&LlmConfig::new("test-key", "glm-4.7")).unwrap();
/// assert_eq!(client.model(), "glm-4.7");
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, ReviewError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ReviewError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Ask the model to review `prompt` and return its reply.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Transport`] if the request cannot be sent or the
    /// body cannot be read, and [`ReviewError::Llm`] on a non-2xx status or a
    /// response without message content.
    pub async fn review(&self, prompt: &str) -> Result<String, ReviewError> {
        self.complete(&ChatRequest::review(&self.config.model, prompt))
            .await
    }

    /// Send a chat-completion request and return the first choice's content.
    ///
    /// # Errors
    ///
    /// See [`LlmClient::review`].
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, ReviewError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| ReviewError::Transport(format!("Z.ai API request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ReviewError::Transport(format!("failed to read Z.ai API response: {e}")))?;

        if !status.is_success() {
            return Err(ReviewError::Llm(format!(
                "Z.ai API error {}: {body}",
                status.as_u16()
            )));
        }

        extract_content(&body)
    }
}

fn extract_content(body: &str) -> Result<String, ReviewError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        ReviewError::Llm(format!("Z.ai API returned a malformed response ({e}): {body}"))
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ReviewError::Llm(format!("Z.ai API returned an empty response: {body}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config_for(server: &mockito::ServerGuard) -> LlmConfig {
        LlmConfig {
            endpoint: format!("{}/api/coding/paas/v4/chat/completions", server.url()),
            ..LlmConfig::new("test-key", "glm-4.7")
        }
    }

    #[test]
    fn chat_message_serializes() {
        let msg = ChatMessage::new(Role::System, "hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn review_request_has_system_then_user() {
        let request = ChatRequest::review("glm-4.7", "the prompt");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1], ChatMessage::new(Role::User, "the prompt"));
    }

    #[test]
    fn extract_content_rejects_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let err = extract_content(body).unwrap_err();
        assert!(err.to_string().contains("empty response"));
    }

    #[test]
    fn extract_content_rejects_missing_choices_field() {
        let body = r#"{"error":"nope"}"#;
        let err = extract_content(body).unwrap_err();
        assert!(err.to_string().contains("malformed response"));
        assert!(err.to_string().contains(body));
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/coding/paas/v4/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "glm-4.7",
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": "review me"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"Looks good."}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new(&config_for(&server)).unwrap();
        let review = client.review("review me").await.unwrap();

        assert_eq!(review, "Looks good.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_choices_fail_with_raw_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/coding/paas/v4/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = LlmClient::new(&config_for(&server)).unwrap();
        let err = client.review("prompt").await.unwrap_err();

        assert!(matches!(err, ReviewError::Llm(_)));
        assert!(err.to_string().contains(r#"{"choices":[]}"#));
    }

    #[tokio::test]
    async fn empty_content_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/coding/paas/v4/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":""}}]}"#)
            .create_async()
            .await;

        let client = LlmClient::new(&config_for(&server)).unwrap();
        let err = client.review("prompt").await.unwrap_err();

        assert!(err.to_string().contains("empty response"));
    }

    #[tokio::test]
    async fn server_error_includes_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/coding/paas/v4/chat/completions")
            .with_status(500)
            .with_body("server error")
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new(&config_for(&server)).unwrap();
        let err = client.review("prompt").await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("500"), "{message}");
        assert!(message.contains("server error"), "{message}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let config = LlmConfig {
            endpoint: "http://127.0.0.1:1/chat/completions".into(),
            ..LlmConfig::new("test-key", "glm-4.7")
        };
        let client = LlmClient::new(&config).unwrap();
        let err = client.review("prompt").await.unwrap_err();

        assert!(matches!(err, ReviewError::Transport(_)), "{err}");
    }
}
