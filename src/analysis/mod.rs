//! Qualitative analysis of the answered interview.
//!
//! Once every question has an answer, the full question/answer list is
//! serialized and sent to the chat completion service with an HR-expert
//! system framing. The response text is surfaced verbatim; no structural
//! parsing is attempted.

use async_trait::async_trait;

use crate::chat::{ChatClient, ChatMessage, ChatRequest};
use crate::error::InterviewError;
use crate::session::AnsweredPair;

/// Temperature used for the assessment.
const TEMPERATURE: f64 = 0.7;

/// Produces a free-text assessment of a completed interview.
#[async_trait]
pub trait ResponseAnalyst: Send + Sync {
    /// Analyzes the full answered interview.
    ///
    /// # Errors
    /// - [`InterviewError::Analysis`] on transport failure or a non-success
    ///   API status; terminal for the session
    async fn analyze(&self, pairs: &[AnsweredPair]) -> Result<String, InterviewError>;
}

/// Analyst backed by the chat completion service.
pub struct InterviewAnalyst {
    chat: ChatClient,
    model: String,
}

impl InterviewAnalyst {
    pub fn new(chat: ChatClient, model: String) -> Self {
        Self { chat, model }
    }
}

#[async_trait]
impl ResponseAnalyst for InterviewAnalyst {
    async fn analyze(&self, pairs: &[AnsweredPair]) -> Result<String, InterviewError> {
        tracing::info!("Requesting analysis of {} answered questions", pairs.len());

        let serialized = serde_json::to_string_pretty(pairs)
            .map_err(|e| InterviewError::Analysis(format!("Failed to serialize answers: {e}")))?;

        let request = ChatRequest::new(
            &self.model,
            vec![
                ChatMessage::system(
                    "You are an HR expert analyzing interview responses. Provide a \
                     comprehensive analysis of the candidate's technical \
                     qualifications and soft skills.",
                ),
                ChatMessage::user(format!(
                    "Please analyze these interview responses. Assess technical \
                     competency, communication skills, and overall fit. Questions \
                     and answers: {serialized}"
                )),
            ],
        )
        .with_temperature(TEMPERATURE);

        self.chat
            .complete(&request)
            .await
            .map_err(|e| InterviewError::Analysis(e.to_string()))
    }
}
