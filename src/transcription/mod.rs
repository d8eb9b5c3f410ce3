//! Speech-to-text conversion for recorded answers.
//!
//! A captured answer is submitted as multipart form data to the transcription
//! endpoint and the recognized text is returned verbatim. A non-success
//! status is a hard failure: the caller keeps the current question active so
//! the user can re-record.

mod openai;

use async_trait::async_trait;

use crate::error::InterviewError;
use crate::recording::AudioClip;

/// Configuration for transcription requests.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// The model to use (e.g. "whisper-1")
    pub model: String,
    /// The API key for authentication
    pub api_key: String,
}

/// Converts a recorded audio clip into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribes one answer.
    ///
    /// # Errors
    /// - [`InterviewError::Transcription`] on transport failure or a
    ///   non-success API status
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, InterviewError>;
}

/// Speech-to-text client for the OpenAI transcription endpoint.
pub struct Transcriber {
    config: TranscriptionConfig,
}

impl Transcriber {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SpeechToText for Transcriber {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, InterviewError> {
        tracing::info!(
            "Transcribing {:.1}s answer with model {}",
            clip.duration_secs,
            self.config.model
        );

        openai::transcribe(&self.config, clip)
            .await
            .map_err(|e| InterviewError::Transcription(e.to_string()))
    }
}
