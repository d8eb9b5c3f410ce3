//! API credential resolution.
//!
//! Credentials are read from the environment exactly once, at startup, before
//! any network request is made. A missing key is a fatal configuration error
//! rather than a failed request later on.

use crate::error::InterviewError;
use crate::questions::QuestionBackend;

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Resolved API credentials for the session.
///
/// The OpenAI key is always required: transcription and analysis go through
/// OpenAI regardless of which backend generates the questions. The Gemini key
/// is only required when the Gemini question backend is selected.
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub gemini_api_key: Option<String>,
}

impl Credentials {
    /// Reads credentials from the environment for the selected backend.
    ///
    /// # Errors
    /// - If a required environment variable is unset or empty
    pub fn from_env(backend: QuestionBackend) -> Result<Self, InterviewError> {
        let openai_api_key = require_var(OPENAI_API_KEY_VAR)?;

        let gemini_api_key = match backend {
            QuestionBackend::Gemini => Some(require_var(GEMINI_API_KEY_VAR)?),
            QuestionBackend::OpenAi => std::env::var(GEMINI_API_KEY_VAR).ok(),
        };

        Ok(Self {
            openai_api_key,
            gemini_api_key,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"***")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

fn require_var(name: &str) -> Result<String, InterviewError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(InterviewError::Configuration(format!(
            "{name} is not set. Export it before starting an interview."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_openai_key_is_fatal() {
        // Run against a scratch variable so the real environment is untouched.
        let err = require_var("INTERVU_TEST_MISSING_KEY_19604").unwrap_err();
        assert!(matches!(err, InterviewError::Configuration(_)));
        assert!(err.to_string().contains("INTERVU_TEST_MISSING_KEY_19604"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        std::env::set_var("INTERVU_TEST_EMPTY_KEY_19604", "  ");
        assert!(require_var("INTERVU_TEST_EMPTY_KEY_19604").is_err());
        std::env::remove_var("INTERVU_TEST_EMPTY_KEY_19604");
    }

    #[test]
    fn debug_hides_key_material() {
        let creds = Credentials {
            openai_api_key: "sk-secret".into(),
            gemini_api_key: Some("AIza-secret".into()),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("AIza-secret"));
    }
}
