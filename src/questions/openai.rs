//! OpenAI chat-completion question backend.
//!
//! Sends the generation prompt as a single user-role message to the chat
//! completion endpoint and returns the raw response text for parsing.

use crate::chat::{ChatClient, ChatMessage, ChatRequest};

/// Temperature used for question generation.
const TEMPERATURE: f64 = 0.7;

/// Requests a question list from the chat completion endpoint.
///
/// # Errors
/// - If the request fails or the API returns a non-success status
pub async fn generate(chat: &ChatClient, model: &str, prompt: &str) -> anyhow::Result<String> {
    let request = ChatRequest::new(model, vec![ChatMessage::user(prompt)])
        .with_temperature(TEMPERATURE);

    chat.complete(&request)
        .await
        .map_err(|e| anyhow::anyhow!("OpenAI question generation failed: {e}"))
}
