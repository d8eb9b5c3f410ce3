//! Gemini question backend.
//!
//! Alternate question generator using the Generative Language API's
//! `generateContent` call. The prompt travels as a single user part; the
//! response text is returned raw for parsing.

use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Requests a question list from the Gemini API.
///
/// # Errors
/// - If the request fails due to network issues (connection, timeout)
/// - If the API returns a non-success status
/// - If the response carries no candidate text
pub async fn generate(api_key: &str, model: &str, prompt: &str) -> anyhow::Result<String> {
    let url = format!(
        "{BASE_URL}/{model}:generateContent?key={}",
        urlencoding::encode(api_key)
    );

    let body = GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
    };

    let client = reqwest::Client::new();

    let response = match client.post(&url).json(&body).send().await {
        Ok(resp) => resp,
        Err(e) => {
            let error_msg = if e.is_connect() {
                "Failed to connect to the Gemini API server. Check your internet connection."
                    .to_string()
            } else if e.is_timeout() {
                "Request to Gemini timed out. The API server is not responding.".to_string()
            } else {
                format!("Gemini network error: {e}")
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
            400 | 401 | 403 => "Gemini API key is invalid or lacks permission. Check the GEMINI_API_KEY environment variable.".to_string(),
            429 => "Too many requests to Gemini. You've hit the API rate limit. Please wait and try again.".to_string(),
            500 | 502 | 503 | 504 => "Gemini API server is experiencing issues. Please try again later.".to_string(),
            _ => format!("Gemini API error (status {status}): {error_body}"),
        };

        return Err(anyhow::anyhow!(human_readable));
    }

    let parsed: GenerateContentResponse = response
        .json()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to parse Gemini response: {e}"))?;

    let text: String = parsed
        .candidates
        .first()
        .map(|candidate| {
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(anyhow::anyhow!("Gemini response contained no candidate text"));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "[{\"question\": "}, {"text": "\"Q1\"}]"}]
                }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<String>();
        assert_eq!(text, r#"[{"question": "Q1"}]"#);
    }

    #[test]
    fn test_empty_candidates_deserialize() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
