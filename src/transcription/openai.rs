//! OpenAI transcription API implementation.
//!
//! Handles transcription requests using multipart form data with bearer token
//! authentication. The audio travels as an in-memory WAV buffer.

use serde::Deserialize;

use super::TranscriptionConfig;
use crate::recording::AudioClip;

const ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// OpenAI API response wrapper
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes a recorded clip using the OpenAI transcription API.
///
/// # Errors
/// - If the API request fails due to network issues (connection, timeout)
/// - If the API returns an HTTP error (401 for invalid key, 429 for rate limit, etc.)
/// - If the API response cannot be parsed
pub async fn transcribe(config: &TranscriptionConfig, clip: &AudioClip) -> anyhow::Result<String> {
    let client = reqwest::Client::new();

    let file_part = reqwest::multipart::Part::bytes(clip.wav.clone())
        .file_name("audio.wav")
        .mime_str("audio/wav")
        .map_err(|e| anyhow::anyhow!("Failed to create file part for upload: {e}"))?;

    let form = reqwest::multipart::Form::new()
        .part("file", file_part)
        .text("model", config.model.clone());

    let url = format!("{ENDPOINT}?response_format=json");

    tracing::debug!(
        "Transcription API Call:\n  URL: {}\n  Method: POST\n  Headers:\n    Authorization: Bearer <redacted>\n    Content-Type: multipart/form-data\n  Body parameters: model={}, file={} bytes",
        url,
        config.model,
        clip.wav.len()
    );

    let response = match client
        .post(&url)
        .bearer_auth(&config.api_key)
        .multipart(form)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            let error_msg = if e.is_connect() {
                "Failed to connect to the transcription server. Check your internet connection.".to_string()
            } else if e.is_timeout() {
                "Transcription request timed out. The API server is not responding.".to_string()
            } else {
                format!("Transcription network error: {e}")
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
            403 => "You don't have permission to use the transcription API. Check your API key and account status.".to_string(),
            429 => "Too many requests. You've hit the API rate limit. Please wait and try again.".to_string(),
            500 | 502 | 503 | 504 => "The transcription server is experiencing issues. Please try again later.".to_string(),
            _ => format!("Transcription API error (status {status}): {error_body}"),
        };

        return Err(anyhow::anyhow!(human_readable));
    }

    let transcription: TranscriptionResponse = response
        .json()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to parse transcription response: {e}"))?;

    tracing::debug!(
        "Transcription response: {} characters",
        transcription.text.len()
    );

    Ok(transcription.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parse() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "I have five years of experience."}"#).unwrap();
        assert_eq!(parsed.text, "I have five years of experience.");
    }
}
