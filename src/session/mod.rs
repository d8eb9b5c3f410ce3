//! Interview session orchestration.
//!
//! The controller is the only component with lifecycle authority over the
//! question cursor: it presents questions in order, forwards each recorded
//! answer to transcription, accumulates question/answer pairs, and requests
//! the final assessment exactly once when every question has an answer.

use serde::Serialize;

use crate::analysis::ResponseAnalyst;
use crate::error::InterviewError;
use crate::questions::{Question, QuestionRequest, QuestionSource};
use crate::recording::AudioClip;
use crate::transcription::SpeechToText;

/// One question paired with its transcribed spoken answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnsweredPair {
    pub question: String,
    pub answer: String,
}

/// Presentation state of the session, rendered by the UI.
///
/// `current_index` is the single source of truth for which question is
/// active. `is_recording` and `is_loading` are kept disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub current_index: usize,
    pub is_recording: bool,
    pub is_loading: bool,
}

/// What happened after an answer was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionProgress {
    /// Another question is waiting; its index is given
    NextQuestion(usize),
    /// Every question is answered; the final assessment text is given
    Finished(String),
}

/// Drives the interview from first question to final assessment.
pub struct SessionController {
    questions: Vec<Question>,
    answers: Vec<AnsweredPair>,
    state: SessionState,
    transcriber: Box<dyn SpeechToText>,
    analyst: Box<dyn ResponseAnalyst>,
    analysis: Option<String>,
}

impl SessionController {
    /// Fetches the question list and builds the controller.
    ///
    /// # Errors
    /// - [`InterviewError::QuestionFetch`] when the source yields no
    ///   questions; a session cannot proceed with zero questions
    pub async fn initialize(
        source: &dyn QuestionSource,
        transcriber: Box<dyn SpeechToText>,
        analyst: Box<dyn ResponseAnalyst>,
        request: &QuestionRequest,
    ) -> Result<Self, InterviewError> {
        let questions = source.fetch_questions(request).await;

        if questions.is_empty() {
            return Err(InterviewError::QuestionFetch(
                "The question service returned no questions. Check your network \
                 connection and API key, then start the interview again."
                    .to_string(),
            ));
        }

        tracing::info!("Session initialized with {} questions", questions.len());

        Ok(Self {
            questions,
            answers: Vec::new(),
            state: SessionState {
                current_index: 0,
                is_recording: false,
                is_loading: false,
            },
            transcriber,
            analyst,
            analysis: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question currently awaiting an answer, if any remain.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.state.current_index)
    }

    pub fn answers(&self) -> &[AnsweredPair] {
        &self.answers
    }

    /// The final assessment, once produced.
    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.state.current_index >= self.questions.len()
    }

    /// Updates the recording flag. Refused while a network operation is in
    /// flight so the two presentation flags stay disjoint.
    pub fn set_recording(&mut self, recording: bool) {
        if recording && self.state.is_loading {
            tracing::warn!("Ignoring recording flag while loading");
            return;
        }
        self.state.is_recording = recording;
    }

    /// Transcribes a recorded answer and advances the session.
    ///
    /// On success the answered pair is appended and the question cursor moves
    /// forward; this is the sole advancement mechanism. When the last
    /// question is answered, the analyst is invoked exactly once and the
    /// assessment is returned.
    ///
    /// # Errors
    /// - [`InterviewError::Transcription`]: the cursor and the pair list are
    ///   left untouched; the user may re-record the same question
    /// - [`InterviewError::Analysis`]: terminal for the session; all answered
    ///   pairs remain available
    pub async fn submit_answer(
        &mut self,
        clip: AudioClip,
    ) -> Result<SessionProgress, InterviewError> {
        let Some(question) = self.current_question().cloned() else {
            return Err(InterviewError::Transcription(
                "No question is awaiting an answer".to_string(),
            ));
        };

        self.state.is_recording = false;
        self.state.is_loading = true;

        let answer = match self.transcriber.transcribe(&clip).await {
            Ok(text) => text,
            Err(e) => {
                // State not advanced; the same question stays active.
                self.state.is_loading = false;
                tracing::warn!("Transcription failed for question {}: {e}", self.state.current_index + 1);
                return Err(e);
            }
        };

        self.answers.push(AnsweredPair {
            question: question.text,
            answer,
        });
        self.state.current_index += 1;

        tracing::info!(
            "Answer {}/{} accepted",
            self.state.current_index,
            self.questions.len()
        );

        if self.state.current_index < self.questions.len() {
            self.state.is_loading = false;
            return Ok(SessionProgress::NextQuestion(self.state.current_index));
        }

        // All questions answered; request the assessment.
        debug_assert!(self.analysis.is_none());
        let result = self.analyst.analyze(&self.answers).await;
        self.state.is_loading = false;

        match result {
            Ok(text) => {
                self.analysis = Some(text.clone());
                Ok(SessionProgress::Finished(text))
            }
            Err(e) => {
                tracing::error!("Analysis failed: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn clip() -> AudioClip {
        AudioClip {
            wav: vec![0; 64],
            sample_rate: 16000,
            duration_secs: 1.0,
        }
    }

    fn questions(n: usize) -> Vec<Question> {
        (1..=n)
            .map(|i| Question {
                text: format!("Q{i}"),
            })
            .collect()
    }

    struct FixedQuestions(Vec<Question>);

    #[async_trait]
    impl QuestionSource for FixedQuestions {
        async fn fetch_questions(&self, _request: &QuestionRequest) -> Vec<Question> {
            self.0.clone()
        }
    }

    /// Returns "A1", "A2", ... per call, optionally failing on scripted calls.
    struct ScriptedTranscriber {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl ScriptedTranscriber {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Some(call),
            }
        }
    }

    #[async_trait]
    impl SpeechToText for ScriptedTranscriber {
        async fn transcribe(&self, _clip: &AudioClip) -> Result<String, InterviewError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on == Some(call) {
                return Err(InterviewError::Transcription("HTTP 500".to_string()));
            }
            Ok(format!("A{call}"))
        }
    }

    struct RecordingAnalyst {
        calls: AtomicUsize,
        seen: Mutex<Vec<AnsweredPair>>,
    }

    impl RecordingAnalyst {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResponseAnalyst for RecordingAnalyst {
        async fn analyze(&self, pairs: &[AnsweredPair]) -> Result<String, InterviewError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = pairs.to_vec();
            Ok("Strong candidate.".to_string())
        }
    }

    struct FailingAnalyst;

    #[async_trait]
    impl ResponseAnalyst for FailingAnalyst {
        async fn analyze(&self, _pairs: &[AnsweredPair]) -> Result<String, InterviewError> {
            Err(InterviewError::Analysis("HTTP 503".to_string()))
        }
    }

    async fn controller_with(
        n: usize,
        transcriber: Box<dyn SpeechToText>,
        analyst: Box<dyn ResponseAnalyst>,
    ) -> SessionController {
        let source = FixedQuestions(questions(n));
        SessionController::initialize(&source, transcriber, analyst, &request())
            .await
            .unwrap()
    }

    fn request() -> QuestionRequest {
        QuestionRequest {
            description: "Front-end developer".to_string(),
            question_types: "personal, behavioral, employment".to_string(),
            language: "English".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_question_list_is_fatal() {
        let source = FixedQuestions(Vec::new());
        let result = SessionController::initialize(
            &source,
            Box::new(ScriptedTranscriber::new()),
            Box::new(RecordingAnalyst::new()),
            &request(),
        )
        .await;
        assert!(matches!(result, Err(InterviewError::QuestionFetch(_))));
    }

    #[tokio::test]
    async fn test_full_session_pairs_in_order_and_single_analysis() {
        let source = FixedQuestions(questions(10));
        let analyst = std::sync::Arc::new(RecordingAnalyst::new());
        let mut controller = SessionController::initialize(
            &source,
            Box::new(ScriptedTranscriber::new()),
            Box::new(SharedAnalyst(std::sync::Arc::clone(&analyst))),
            &request(),
        )
        .await
        .unwrap();

        for i in 0..9 {
            let progress = controller.submit_answer(clip()).await.unwrap();
            assert_eq!(progress, SessionProgress::NextQuestion(i + 1));
            // No assessment before the final answer.
            assert_eq!(analyst.calls.load(Ordering::SeqCst), 0);
        }

        let progress = controller.submit_answer(clip()).await.unwrap();
        assert_eq!(
            progress,
            SessionProgress::Finished("Strong candidate.".to_string())
        );

        assert!(controller.is_complete());
        assert_eq!(controller.answers().len(), 10);
        assert_eq!(analyst.calls.load(Ordering::SeqCst), 1);

        let expected: Vec<AnsweredPair> = (1..=10)
            .map(|i| AnsweredPair {
                question: format!("Q{i}"),
                answer: format!("A{i}"),
            })
            .collect();
        assert_eq!(controller.answers(), expected.as_slice());
        assert_eq!(*analyst.seen.lock().unwrap(), expected);
    }

    /// Forwards to a shared analyst so the test can inspect it afterwards.
    struct SharedAnalyst(std::sync::Arc<RecordingAnalyst>);

    #[async_trait]
    impl ResponseAnalyst for SharedAnalyst {
        async fn analyze(&self, pairs: &[AnsweredPair]) -> Result<String, InterviewError> {
            self.0.analyze(pairs).await
        }
    }

    #[tokio::test]
    async fn test_transcription_failure_leaves_state_untouched() {
        let mut controller = controller_with(
            3,
            Box::new(ScriptedTranscriber::failing_on(2)),
            Box::new(RecordingAnalyst::new()),
        )
        .await;

        controller.submit_answer(clip()).await.unwrap();
        assert_eq!(controller.state().current_index, 1);

        let err = controller.submit_answer(clip()).await.unwrap_err();
        assert!(matches!(err, InterviewError::Transcription(_)));
        assert_eq!(controller.state().current_index, 1);
        assert_eq!(controller.answers().len(), 1);
        assert!(!controller.state().is_loading);
        assert_eq!(controller.current_question().unwrap().text, "Q2");

        // Re-recording the same question succeeds and advances.
        let progress = controller.submit_answer(clip()).await.unwrap();
        assert_eq!(progress, SessionProgress::NextQuestion(2));
        assert_eq!(controller.answers()[1].question, "Q2");
    }

    #[tokio::test]
    async fn test_analysis_failure_is_terminal_but_preserves_answers() {
        let mut controller = controller_with(
            1,
            Box::new(ScriptedTranscriber::new()),
            Box::new(FailingAnalyst),
        )
        .await;

        let err = controller.submit_answer(clip()).await.unwrap_err();
        assert!(matches!(err, InterviewError::Analysis(_)));
        assert!(controller.is_complete());
        assert_eq!(controller.answers().len(), 1);
        assert!(controller.analysis().is_none());
    }

    #[tokio::test]
    async fn test_recording_flag_refused_while_loading() {
        let mut controller = controller_with(
            1,
            Box::new(ScriptedTranscriber::new()),
            Box::new(RecordingAnalyst::new()),
        )
        .await;

        controller.set_recording(true);
        assert!(controller.state().is_recording);
        controller.set_recording(false);

        controller.state.is_loading = true;
        controller.set_recording(true);
        assert!(!controller.state().is_recording);
    }
}
