//! Question-generation backend definitions.
//!
//! Two backends generate the interview question list. They are functionally
//! identical adapters over the same contract and differ only in request and
//! response shape; configuration selects which one is used.

use serde::{Deserialize, Serialize};

/// Represents a supported question-generation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionBackend {
    #[default]
    OpenAi,
    Gemini,
}

impl QuestionBackend {
    pub fn id(&self) -> &'static str {
        match self {
            QuestionBackend::OpenAi => "openai",
            QuestionBackend::Gemini => "gemini",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QuestionBackend::OpenAi => "OpenAI",
            QuestionBackend::Gemini => "Gemini",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "openai" => Some(QuestionBackend::OpenAi),
            "gemini" => Some(QuestionBackend::Gemini),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[QuestionBackend::OpenAi, QuestionBackend::Gemini]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_ids_match() {
        for backend in QuestionBackend::all() {
            let toml_value = toml::Value::try_from(backend).unwrap();
            assert_eq!(toml_value.as_str(), Some(backend.id()));
            assert_eq!(QuestionBackend::from_id(backend.id()), Some(*backend));
        }
        assert_eq!(QuestionBackend::from_id("deepgram"), None);
    }
}
