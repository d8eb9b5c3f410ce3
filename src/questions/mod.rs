//! Interview question generation.
//!
//! Builds the fixed-size question list for a session from a job description,
//! a question-type mix, and a language. Two interchangeable backends are
//! supported behind the [`QuestionSource`] contract; the response is parsed
//! strictly as a JSON array of question objects, with a single-question
//! fallback when the model returns something else.

mod backend;
mod gemini;
mod openai;

pub use backend::QuestionBackend;

use async_trait::async_trait;
use serde::Deserialize;

use crate::chat::ChatClient;
use crate::config::credentials::Credentials;
use crate::config::file::ProvidersConfig;

/// Number of questions requested per session.
pub const QUESTION_COUNT: usize = 10;

/// One interview question. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
}

/// Inputs to question generation.
#[derive(Debug, Clone)]
pub struct QuestionRequest {
    /// The job description the questions are based on
    pub description: String,
    /// Requested blend of question categories
    pub question_types: String,
    /// Language the questions should be written in
    pub language: String,
}

/// A source of interview questions.
///
/// A transport or service failure yields an empty list (logged, not raised);
/// the caller treats an empty list as fatal to session startup. A response
/// that arrives but cannot be parsed yields a single-question fallback list.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self, request: &QuestionRequest) -> Vec<Question>;
}

/// Expected shape of each entry in the generated JSON array.
#[derive(Debug, Deserialize)]
struct QuestionItem {
    question: String,
}

/// Question provider routing requests to the configured backend.
pub struct QuestionProvider {
    backend: QuestionBackend,
    chat: ChatClient,
    chat_model: String,
    gemini_model: String,
    gemini_api_key: Option<String>,
}

impl QuestionProvider {
    /// Creates a provider from the provider configuration and resolved
    /// credentials.
    pub fn new(providers: &ProvidersConfig, credentials: &Credentials) -> Self {
        Self {
            backend: providers.questions,
            chat: ChatClient::new(credentials.openai_api_key.clone()),
            chat_model: providers.openai.chat_model.clone(),
            gemini_model: providers.gemini.model.clone(),
            gemini_api_key: credentials.gemini_api_key.clone(),
        }
    }
}

#[async_trait]
impl QuestionSource for QuestionProvider {
    async fn fetch_questions(&self, request: &QuestionRequest) -> Vec<Question> {
        tracing::info!(
            "Fetching {} questions via {} backend",
            QUESTION_COUNT,
            self.backend.name()
        );

        let prompt = build_prompt(request);

        let raw = match self.backend {
            QuestionBackend::OpenAi => {
                openai::generate(&self.chat, &self.chat_model, &prompt).await
            }
            QuestionBackend::Gemini => match self.gemini_api_key.as_deref() {
                Some(key) => gemini::generate(key, &self.gemini_model, &prompt).await,
                None => Err(anyhow::anyhow!("No Gemini API key available")),
            },
        };

        match raw {
            Ok(text) => questions_from_response(&text),
            Err(e) => {
                tracing::error!("Question generation request failed: {e}");
                Vec::new()
            }
        }
    }
}

/// Builds the generation prompt embedding description, type mix and language.
fn build_prompt(request: &QuestionRequest) -> String {
    format!(
        "Act as an HR expert and create {count} interview questions based on this \
         job description: {description}. Include a mix of {types}. Questions should \
         be in {language}. Return the response as a JSON array with 'question' field \
         only.(note that: the first question will be: Talk about your self in \
         {language})",
        count = QUESTION_COUNT,
        description = request.description,
        types = request.question_types,
        language = request.language,
    )
}

/// Parses a generation response, falling back to a single generic question
/// when the text is not the expected JSON array.
fn questions_from_response(raw: &str) -> Vec<Question> {
    match serde_json::from_str::<Vec<QuestionItem>>(raw.trim()) {
        Ok(items) => items
            .into_iter()
            .map(|item| Question {
                text: item.question,
            })
            .collect(),
        Err(e) => {
            tracing::error!("Failed to parse question list, using fallback: {e}");
            vec![Question {
                text: "Tell me about your experience with front-end development."
                    .to_string(),
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_formed_response(count: usize) -> String {
        let items: Vec<String> = (1..=count)
            .map(|i| format!(r#"{{"question": "Question number {i}"}}"#))
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn test_well_formed_list_preserved_in_order() {
        let questions = questions_from_response(&well_formed_response(10));
        assert_eq!(questions.len(), 10);
        for (i, q) in questions.iter().enumerate() {
            assert_eq!(q.text, format!("Question number {}", i + 1));
        }
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let raw = format!("\n  {}  \n", well_formed_response(2));
        assert_eq!(questions_from_response(&raw).len(), 2);
    }

    #[test]
    fn test_unparseable_response_yields_fallback() {
        for raw in [
            "Sure! Here are your questions:",
            r#"{"question": "not an array"}"#,
            r#"```json
[{"question": "fenced"}]
```"#,
        ] {
            let questions = questions_from_response(raw);
            assert_eq!(questions.len(), 1);
            assert!(questions[0].text.contains("front-end"));
        }
    }

    #[test]
    fn test_prompt_embeds_inputs() {
        let prompt = build_prompt(&QuestionRequest {
            description: "We need a Rust engineer.".into(),
            question_types: "personal, behavioral, employment".into(),
            language: "English".into(),
        });
        assert!(prompt.contains("10 interview questions"));
        assert!(prompt.contains("We need a Rust engineer."));
        assert!(prompt.contains("personal, behavioral, employment"));
        assert!(prompt.contains("in English"));
    }
}
