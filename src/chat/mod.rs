//! Chat-completion client shared by question generation and answer analysis.
//!
//! The request/response types mirror the OpenAI chat completion format.
//! Both AI-facing features in intervu (building the question list and the
//! final assessment) go through [`ChatClient`].

use serde::{Deserialize, Serialize};

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author ("system" or "user").
    pub role: String,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// A chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model identifier (e.g. "gpt-4").
    pub model: String,
    /// The conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

/// A single completion choice within a response.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

/// The assistant message inside a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

impl ChatResponse {
    /// Returns the text content of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Minimal authenticated client for an OpenAI-format chat completion endpoint.
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

impl ChatClient {
    /// Creates a client against the default OpenAI endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENAI_BASE_URL.to_string())
    }

    /// Creates a client against a custom OpenAI-compatible endpoint.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Sends a chat completion request and returns the first choice's text.
    ///
    /// # Errors
    /// - If the request fails due to network issues (connection, timeout)
    /// - If the API returns an HTTP error status
    /// - If the response cannot be parsed or contains no choices
    pub async fn complete(&self, request: &ChatRequest) -> anyhow::Result<String> {
        let url = self.completions_url();

        tracing::debug!(
            "Chat completion request: model={}, messages={}",
            request.model,
            request.messages.len()
        );

        let response = match self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let error_msg = if e.is_connect() {
                    "Failed to connect to the chat completion server. Check your internet connection.".to_string()
                } else if e.is_timeout() {
                    "Chat completion request timed out. The API server is not responding.".to_string()
                } else {
                    format!("Chat completion network error: {e}")
                };
                return Err(anyhow::anyhow!(error_msg));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let human_readable = match status.as_u16() {
                401 => "API key is invalid or expired. Check the OPENAI_API_KEY environment variable.".to_string(),
                403 => "You don't have permission to use this API. Check your API key and account status.".to_string(),
                429 => "Too many requests. You've hit the API rate limit. Please wait and try again.".to_string(),
                500 | 502 | 503 | 504 => "The chat completion server is experiencing issues. Please try again later.".to_string(),
                _ => format!("Chat completion error (status {status}): {error_body}"),
            };

            return Err(anyhow::anyhow!(human_readable));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse chat completion response: {e}"))?;

        let content = completion
            .content()
            .ok_or_else(|| anyhow::anyhow!("Chat completion response contained no choices"))?;

        tracing::debug!("Chat completion response: {} characters", content.len());

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_helpers_set_roles() {
        let sys = ChatMessage::system("You are an HR expert.");
        assert_eq!(sys.role, "system");
        assert_eq!(sys.content, "You are an HR expert.");

        let user = ChatMessage::user("Hello");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn request_skips_absent_temperature() {
        let req = ChatRequest::new("gpt-4", vec![ChatMessage::user("Hi")]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""model":"gpt-4""#));
        assert!(!json.contains("temperature"));

        let req = req.with_temperature(0.7);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""temperature":0.7"#));
    }

    #[test]
    fn response_content_returns_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "Hello!"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.content(), Some("Hello!"));
    }

    #[test]
    fn response_content_empty_choices() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(resp.content(), None);
    }

    #[test]
    fn completions_url_strips_trailing_slash() {
        let client =
            ChatClient::with_base_url("sk-test".into(), "https://api.example.com/v1/".into());
        assert_eq!(
            client.completions_url(),
            "https://api.example.com/v1/chat/completions"
        );
    }
}
