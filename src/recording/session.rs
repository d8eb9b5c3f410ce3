//! Recording lifecycle for a single interview answer.
//!
//! Owns microphone capture for one question at a time: an explicit start
//! acquires the device and launches the countdown, stop (manual or countdown
//! expiry) funnels through one finalization path that cancels both periodic
//! tasks, releases the device, and hands the encoded clip to the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::audio::{self, AudioClip, AudioRecorder};
use super::countdown::{Countdown, CountdownStatus};
use crate::error::InterviewError;

/// Lifecycle phase of the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderPhase {
    /// No capture has happened yet
    Idle,
    /// The microphone is live
    Recording,
    /// A capture finished; the recorder may be started again
    Stopped,
}

/// What a toggle request maps to in a given phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Start,
    Stop,
}

impl RecorderPhase {
    /// A single control drives recording: while recording it means stop,
    /// otherwise it means start. There is never a path from `Recording` to a
    /// second start.
    pub fn on_toggle(self) -> ToggleAction {
        match self {
            RecorderPhase::Recording => ToggleAction::Stop,
            RecorderPhase::Idle | RecorderPhase::Stopped => ToggleAction::Start,
        }
    }

    /// Whether a start request is accepted in this phase.
    pub fn accepts_start(self) -> bool {
        !matches!(self, RecorderPhase::Recording)
    }
}

/// Result of a toggle request.
pub enum ToggleOutcome {
    /// A new capture began
    Started,
    /// The active capture finished; here is the clip
    Stopped(AudioClip),
}

/// Manages one answer recording at a time.
///
/// Observable state (remaining seconds, input level) is published through
/// watch channels so the UI can render it while capture runs.
pub struct RecordingSession {
    max_duration_secs: u32,
    device: String,
    requested_sample_rate: u32,
    phase: RecorderPhase,
    recorder: Option<AudioRecorder>,
    remaining_tx: watch::Sender<u32>,
    remaining_rx: watch::Receiver<u32>,
    level_tx: watch::Sender<u8>,
    level_rx: watch::Receiver<u8>,
    expired: Arc<AtomicBool>,
    countdown_task: Option<JoinHandle<()>>,
    sampler_task: Option<JoinHandle<()>>,
}

impl RecordingSession {
    pub fn new(max_duration_secs: u32, device: String, requested_sample_rate: u32) -> Self {
        let (remaining_tx, remaining_rx) = watch::channel(max_duration_secs);
        let (level_tx, level_rx) = watch::channel(0);

        Self {
            max_duration_secs,
            device,
            requested_sample_rate,
            phase: RecorderPhase::Idle,
            recorder: None,
            remaining_tx,
            remaining_rx,
            level_tx,
            level_rx,
            expired: Arc::new(AtomicBool::new(false)),
            countdown_task: None,
            sampler_task: None,
        }
    }

    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == RecorderPhase::Recording
    }

    /// Seconds left on the countdown, or the nominal duration when idle.
    pub fn remaining_secs(&self) -> u32 {
        *self.remaining_rx.borrow()
    }

    /// Cosmetic input level (0-100) for the meter display.
    pub fn input_level(&self) -> u8 {
        *self.level_rx.borrow()
    }

    /// Whether the countdown ran out; the caller must respond by stopping.
    pub fn countdown_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }

    /// Applies toggle semantics: start when idle or stopped, stop when
    /// recording.
    pub fn toggle(&mut self) -> Result<ToggleOutcome, InterviewError> {
        match self.phase.on_toggle() {
            ToggleAction::Start => self.start().map(|()| ToggleOutcome::Started),
            ToggleAction::Stop => self
                .stop()
                .map(ToggleOutcome::Stopped)
                .map_err(|e| InterviewError::DeviceAccess(e.to_string())),
        }
    }

    /// Starts capturing and launches the countdown and the level sampler.
    ///
    /// A start request while already recording is rejected (logged no-op);
    /// no second capture is ever created.
    ///
    /// # Errors
    /// - [`InterviewError::DeviceAccess`] if the microphone is denied or
    ///   unavailable; the user may retry
    pub fn start(&mut self) -> Result<(), InterviewError> {
        if !self.phase.accepts_start() {
            tracing::warn!("Start requested while already recording; ignoring");
            return Ok(());
        }

        let mut recorder = AudioRecorder::new(self.requested_sample_rate, self.device.clone());
        recorder
            .start_capture()
            .map_err(|e| InterviewError::DeviceAccess(e.to_string()))?;

        self.expired.store(false, Ordering::SeqCst);
        let _ = self.remaining_tx.send(self.max_duration_secs);

        self.countdown_task = Some(self.spawn_countdown());
        self.sampler_task = Some(self.spawn_level_sampler(&recorder));

        self.recorder = Some(recorder);
        self.phase = RecorderPhase::Recording;
        tracing::info!(
            "Recording started (max {}s on device '{}')",
            self.max_duration_secs,
            self.device
        );
        Ok(())
    }

    /// Stops the active capture and returns the recorded clip.
    ///
    /// Manual stop and countdown expiry both arrive here; it is the only
    /// finalization path.
    ///
    /// # Errors
    /// - If no capture is active
    /// - If WAV encoding fails
    pub fn stop(&mut self) -> anyhow::Result<AudioClip> {
        // Both periodic tasks are cancelled together on every stop path.
        if let Some(task) = self.countdown_task.take() {
            task.abort();
        }
        if let Some(task) = self.sampler_task.take() {
            task.abort();
        }

        let mut recorder = self
            .recorder
            .take()
            .ok_or_else(|| anyhow!("No recording in progress"))?;

        let clip = recorder.stop_capture()?;

        // Reset the displayed countdown to the nominal duration for the next
        // question.
        let _ = self.remaining_tx.send(self.max_duration_secs);
        let _ = self.level_tx.send(0);
        self.expired.store(false, Ordering::SeqCst);
        self.phase = RecorderPhase::Stopped;

        tracing::info!("Recording stopped ({:.1}s captured)", clip.duration_secs);
        Ok(clip)
    }

    fn spawn_countdown(&self) -> JoinHandle<()> {
        let mut countdown = Countdown::new(self.max_duration_secs);
        let remaining_tx = self.remaining_tx.clone();
        let expired = Arc::clone(&self.expired);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick completes immediately; skip it so the
            // countdown shows its full value for one second.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match countdown.tick() {
                    CountdownStatus::Remaining(left) => {
                        let _ = remaining_tx.send(left);
                    }
                    CountdownStatus::Expired => {
                        let _ = remaining_tx.send(0);
                        expired.store(true, Ordering::SeqCst);
                        break;
                    }
                }
            }
        })
    }

    fn spawn_level_sampler(&self, recorder: &AudioRecorder) -> JoinHandle<()> {
        let samples = recorder.samples_handle();
        let sample_rate = recorder.sample_rate();
        let level_tx = self.level_tx.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(100));
            loop {
                ticker.tick().await;
                let level = {
                    let samples = samples.lock().unwrap();
                    audio::recent_level(&samples, sample_rate)
                };
                let _ = level_tx.send(level);
            }
        })
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        if let Some(task) = self.countdown_task.take() {
            task.abort();
        }
        if let Some(task) = self.sampler_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_maps_phase_to_action() {
        assert_eq!(RecorderPhase::Idle.on_toggle(), ToggleAction::Start);
        assert_eq!(RecorderPhase::Recording.on_toggle(), ToggleAction::Stop);
        assert_eq!(RecorderPhase::Stopped.on_toggle(), ToggleAction::Start);
    }

    #[test]
    fn test_start_rejected_only_while_recording() {
        assert!(RecorderPhase::Idle.accepts_start());
        assert!(!RecorderPhase::Recording.accepts_start());
        assert!(RecorderPhase::Stopped.accepts_start());
    }

    #[tokio::test]
    async fn test_stop_without_start_is_an_error() {
        let mut session = RecordingSession::new(59, "default".to_string(), 16000);
        assert_eq!(session.phase(), RecorderPhase::Idle);
        assert!(session.stop().is_err());
        assert_eq!(session.remaining_secs(), 59);
    }
}
