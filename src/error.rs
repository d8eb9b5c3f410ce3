//! Error taxonomy for the interview workflow.
//!
//! Every service boundary converts its failures into one of these variants
//! at the component that made the call; nothing here is allowed to crash
//! the session process.

use thiserror::Error;

/// Errors surfaced by the interview session and its collaborators.
#[derive(Error, Debug)]
pub enum InterviewError {
    /// Missing or invalid startup configuration (e.g. absent API key).
    /// Fatal before any network call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The question service produced no usable questions. Fatal at startup;
    /// a session cannot proceed with zero questions.
    #[error("failed to fetch interview questions: {0}")]
    QuestionFetch(String),

    /// Microphone denied or unavailable. Reported to the user; the start
    /// action may be retried.
    #[error("microphone unavailable: {0}")]
    DeviceAccess(String),

    /// The speech-to-text service rejected or failed the request. The
    /// current question stays active and may be re-recorded.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// The analysis service failed. Terminal for the session.
    #[error("analysis failed: {0}")]
    Analysis(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause() {
        let err = InterviewError::Transcription("HTTP 500".into());
        assert_eq!(err.to_string(), "transcription failed: HTTP 500");

        let err = InterviewError::Configuration("OPENAI_API_KEY is not set".into());
        assert!(err.to_string().starts_with("configuration error:"));
    }
}
