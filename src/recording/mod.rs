//! Answer recording feature for intervu.
//!
//! Provides microphone capture, the per-answer countdown, and the recording
//! session state machine driving both.

pub mod audio;
pub mod countdown;
pub mod session;

pub use audio::{AudioClip, AudioRecorder};
pub use countdown::{Countdown, CountdownStatus};
pub use session::{RecorderPhase, RecordingSession, ToggleOutcome};
