//! Run a full mock-interview session.
//!
//! Wires the question provider, recording session, transcription and analysis
//! clients together and drives the wizard loop: present a question, record
//! the spoken answer, transcribe it, advance, and finish with the assessment.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::InterviewAnalyst;
use crate::chat::ChatClient;
use crate::config::{Credentials, IntervuConfig};
use crate::error::InterviewError;
use crate::questions::{QuestionProvider, QuestionRequest};
use crate::recording::{RecordingSession, ToggleOutcome};
use crate::session::{SessionController, SessionProgress};
use crate::transcription::{Transcriber, TranscriptionConfig};
use crate::ui::interview::QuestionView;
use crate::ui::{ErrorScreen, InterviewCommand, InterviewTui};

/// How the wizard loop ended.
enum SessionEnd {
    /// The user quit before answering everything
    Aborted,
    /// Every answer is in and the assessment arrived
    Finished(String),
    /// A terminal error occurred
    Failed(InterviewError),
}

/// Handles the interview command.
///
/// # Arguments
/// * `description_file` - Optional file to read the job description from
/// * `output_file` - Optional file path the final analysis is written to
pub async fn handle_interview(
    description_file: Option<PathBuf>,
    output_file: Option<String>,
) -> Result<(), anyhow::Error> {
    tracing::info!("=== intervu Interview Session Started ===");

    let config_data = match IntervuConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            let error_message = format!(
                "Configuration Error:\n\n{err}\n\nPlease check your ~/.config/intervu/intervu.toml file and try again."
            );
            show_fatal(&error_message)?;
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    // Credentials are resolved once, before any network call.
    let credentials = match Credentials::from_env(config_data.providers.questions) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("Credential resolution failed: {e}");
            show_fatal(&format!("Configuration Error:\n\n{e}"))?;
            return Err(e.into());
        }
    };

    let description = match &description_file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read job description '{}': {e}", path.display())
        })?,
        None => config_data.interview.job_description().to_string(),
    };

    let request = QuestionRequest {
        description,
        question_types: config_data.interview.question_types.clone(),
        language: config_data.interview.language.clone(),
    };

    let provider = QuestionProvider::new(&config_data.providers, &credentials);
    let transcriber = Box::new(Transcriber::new(TranscriptionConfig {
        model: config_data.providers.openai.transcription_model.clone(),
        api_key: credentials.openai_api_key.clone(),
    }));
    let analyst = Box::new(InterviewAnalyst::new(
        ChatClient::new(credentials.openai_api_key.clone()),
        config_data.providers.openai.chat_model.clone(),
    ));

    let spinner = cliclack::spinner();
    spinner.start("Preparing interview questions...");

    let mut controller =
        match SessionController::initialize(&provider, transcriber, analyst, &request).await {
            Ok(controller) => {
                spinner.stop(format!("{} questions ready", controller.question_count()));
                controller
            }
            Err(e) => {
                spinner.error("Could not prepare interview questions");
                tracing::error!("Session initialization failed: {e}");
                show_fatal(&format!(
                    "Startup Error:\n\n{e}\n\nNothing was recorded."
                ))?;
                return Err(e.into());
            }
        };

    let mut tui = InterviewTui::new()?;
    let mut recording = RecordingSession::new(
        config_data.interview.max_recording_secs,
        config_data.audio.device.clone(),
        config_data.audio.sample_rate,
    );

    // SIGUSR1 stops an active recording, for external triggers and scripting.
    let external_stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&external_stop))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    let mut notice: Option<String> = None;

    let ending = loop {
        let state = controller.state();
        let Some(question_text) = controller.current_question().map(|q| q.text.clone()) else {
            // All answers are in; submit_answer reported Finished already.
            break SessionEnd::Aborted;
        };

        tui.render_question(&QuestionView {
            index: state.current_index,
            total: controller.question_count(),
            question: &question_text,
            remaining_secs: recording.remaining_secs(),
            max_secs: config_data.interview.max_recording_secs,
            recording: recording.is_recording(),
            level: recording.input_level(),
            notice: notice.as_deref(),
        })?;

        let mut stop_requested = false;

        match tui.handle_input()? {
            InterviewCommand::Continue => {}
            InterviewCommand::Quit => break SessionEnd::Aborted,
            InterviewCommand::ToggleRecording => match recording.toggle() {
                Ok(ToggleOutcome::Started) => {
                    controller.set_recording(true);
                    notice = None;
                    continue;
                }
                Ok(ToggleOutcome::Stopped(clip)) => {
                    controller.set_recording(false);
                    match submit_answer(&mut controller, clip, &mut tui).await {
                        Ok(Some(analysis)) => break SessionEnd::Finished(analysis),
                        Ok(None) => notice = None,
                        Err(SubmitOutcome::Retryable(message)) => notice = Some(message),
                        Err(SubmitOutcome::Terminal(e)) => break SessionEnd::Failed(e),
                    }
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Recording toggle failed: {e}");
                    notice = Some(format!("{e}\nPress Space to try again."));
                    continue;
                }
            },
        }

        // Countdown expiry auto-stops; an external SIGUSR1 behaves like
        // pressing stop. Both converge on the same stop routine below.
        if recording.countdown_expired() {
            stop_requested = true;
        }
        if external_stop.swap(false, Ordering::SeqCst) && recording.is_recording() {
            tracing::info!("Received SIGUSR1: stopping recording via external trigger");
            stop_requested = true;
        }

        if stop_requested && recording.is_recording() {
            match recording.stop() {
                Ok(clip) => {
                    controller.set_recording(false);
                    match submit_answer(&mut controller, clip, &mut tui).await {
                        Ok(Some(analysis)) => break SessionEnd::Finished(analysis),
                        Ok(None) => notice = None,
                        Err(SubmitOutcome::Retryable(message)) => notice = Some(message),
                        Err(SubmitOutcome::Terminal(e)) => break SessionEnd::Failed(e),
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to stop recording: {e}");
                    controller.set_recording(false);
                    notice = Some(format!("Recording failed: {e}\nPress Space to try again."));
                }
            }
        }
    };

    // Release the microphone if a capture was still running.
    if recording.is_recording() {
        if let Err(e) = recording.stop() {
            tracing::warn!("Failed to stop recording on exit: {e}");
        }
    }

    match ending {
        SessionEnd::Finished(analysis) => {
            tui.render_analysis(&analysis)?;
            tui.wait_for_key()?;
            tui.cleanup()
                .map_err(|e| anyhow::anyhow!("Cleanup failed: {e}"))?;

            if let Some(path) = output_file {
                std::fs::write(&path, &analysis)
                    .map_err(|e| anyhow::anyhow!("Failed to write analysis to '{path}': {e}"))?;
                tracing::info!("Analysis written to {path}");
            }

            tracing::info!("=== intervu Interview Session Completed ===");
            Ok(())
        }
        SessionEnd::Aborted => {
            tui.cleanup()
                .map_err(|e| anyhow::anyhow!("Cleanup failed: {e}"))?;
            tracing::info!(
                "Interview aborted by user after {} answered questions",
                controller.answers().len()
            );
            Ok(())
        }
        SessionEnd::Failed(e) => {
            tui.cleanup().ok();
            let answered = controller.answers().len();
            show_fatal(&format!(
                "Session Error:\n\n{e}\n\n{answered} answered question(s) were recorded before the failure."
            ))?;
            Err(e.into())
        }
    }
}

/// Why a submitted answer did not advance the session.
enum SubmitOutcome {
    /// The user may re-record the same question
    Retryable(String),
    /// The session cannot continue
    Terminal(InterviewError),
}

/// Transcribes and commits one answer while animating the loading spinner.
///
/// Returns `Ok(Some(analysis))` when this was the final answer.
async fn submit_answer(
    controller: &mut SessionController,
    clip: crate::recording::AudioClip,
    tui: &mut InterviewTui,
) -> Result<Option<String>, SubmitOutcome> {
    let message = if controller.state().current_index + 1 == controller.question_count() {
        "Transcribing your answer and preparing the analysis..."
    } else {
        "Transcribing your answer..."
    };

    let result = {
        let mut submit = Box::pin(controller.submit_answer(clip));
        loop {
            tokio::select! {
                result = &mut submit => break result,
                _ = tokio::time::sleep(Duration::from_millis(80)) => {
                    if let Err(e) = tui.render_loading(message) {
                        tracing::warn!("Failed to render loading frame: {e}");
                    }
                }
            }
        }
    };

    match result {
        Ok(SessionProgress::NextQuestion(_)) => Ok(None),
        Ok(SessionProgress::Finished(analysis)) => Ok(Some(analysis)),
        Err(e @ InterviewError::Transcription(_)) => Err(SubmitOutcome::Retryable(format!(
            "{e}\nPress Space to record this answer again."
        ))),
        Err(e) => Err(SubmitOutcome::Terminal(e)),
    }
}

/// Shows a fatal error full-screen and waits for acknowledgement.
fn show_fatal(message: &str) -> anyhow::Result<()> {
    let mut error_screen = ErrorScreen::new()?;
    error_screen.show_error(message)?;
    error_screen.cleanup()?;
    Ok(())
}
