//! Configuration file management for intervu.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::questions::QuestionBackend;

/// Job description used when neither the config file nor the command line
/// supplies one.
const DEFAULT_JOB_DESCRIPTION: &str = "\
Job Summary:
We are seeking a skilled Front-End Web Developer to join our development team. \
The ideal candidate will have a strong understanding of web technologies, a keen \
eye for design, and the ability to translate designs into responsive, \
user-friendly web applications.

Key Responsibilities:
- Develop and maintain responsive web applications
- Translate UI/UX designs into functional web pages
- Optimize web applications for performance
- Ensure cross-browser compatibility
- Write clean, maintainable code
- Participate in code reviews

Required Skills:
- Proficiency in HTML5, CSS3, and JavaScript
- Experience with modern front-end frameworks
- Knowledge of responsive design principles
- Experience with version control systems
- Strong problem-solving skills
";

/// Interview session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Language the questions should be generated in
    #[serde(default = "default_language")]
    pub language: String,
    /// Requested blend of question categories, as free text embedded in the
    /// generation prompt
    #[serde(default = "default_question_types")]
    pub question_types: String,
    /// Maximum recording time per answer, in seconds
    #[serde(default = "default_max_recording_secs")]
    pub max_recording_secs: u32,
    /// Job description the questions are generated from. When absent, a
    /// built-in front-end developer description is used.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_language() -> String {
    "English".to_string()
}

fn default_question_types() -> String {
    "personal questions related to the job description, questions related to \
     behaviors, and questions related to employment"
        .to_string()
}

fn default_max_recording_secs() -> u32 {
    59
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            question_types: default_question_types(),
            max_recording_secs: default_max_recording_secs(),
            description: None,
        }
    }
}

impl InterviewConfig {
    /// Returns the configured job description, or the built-in default.
    pub fn job_description(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_JOB_DESCRIPTION)
    }
}

/// Audio recording configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `intervu list-devices`
    /// - device name from `intervu list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Recording sample rate in Hz (16000 recommended for speech recognition)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
        }
    }
}

/// OpenAI backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Chat model used for question generation and answer analysis
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Speech-to-text model used for answer transcription
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            chat_model: default_chat_model(),
            transcription_model: default_transcription_model(),
        }
    }
}

/// Gemini backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model used for question generation when the Gemini backend is selected
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

fn default_gemini_model() -> String {
    "gemini-pro".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
        }
    }
}

/// All provider configurations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Which backend generates the question list
    #[serde(default)]
    pub questions: QuestionBackend,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntervuConfig {
    #[serde(default)]
    pub interview: InterviewConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl IntervuConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = config_path()?;
        let config_content = fs::read_to_string(&config_path)?;
        let config: IntervuConfig = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = config_path()?;
        let config_content = toml::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Path of the configuration file, `~/.config/intervu/intervu.toml`.
///
/// The parent directory is created on demand so callers can write the file
/// directly.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    let path = home.join(".config").join("intervu").join("intervu.toml");

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IntervuConfig::default();
        assert_eq!(config.interview.language, "English");
        assert_eq!(config.interview.max_recording_secs, 59);
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.providers.questions, QuestionBackend::OpenAi);
        assert_eq!(config.providers.openai.transcription_model, "whisper-1");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: IntervuConfig = toml::from_str("").unwrap();
        assert_eq!(config.interview.max_recording_secs, 59);
        assert_eq!(config.audio.device, "default");
    }

    #[test]
    fn test_parse_overrides() {
        let config: IntervuConfig = toml::from_str(
            r#"
            [interview]
            language = "Swedish"
            max_recording_secs = 30

            [providers]
            questions = "gemini"
            "#,
        )
        .unwrap();
        assert_eq!(config.interview.language, "Swedish");
        assert_eq!(config.interview.max_recording_secs, 30);
        assert_eq!(config.providers.questions, QuestionBackend::Gemini);
        assert_eq!(config.providers.gemini.model, "gemini-pro");
    }

    #[test]
    fn test_job_description_fallback() {
        let mut config = InterviewConfig::default();
        assert!(config.job_description().contains("Front-End Web Developer"));

        config.description = Some("  ".to_string());
        assert!(config.job_description().contains("Front-End Web Developer"));

        config.description = Some("Rust engineer".to_string());
        assert_eq!(config.job_description(), "Rust engineer");
    }
}
