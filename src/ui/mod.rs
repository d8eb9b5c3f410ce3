//! Terminal user interface for intervu.
//!
//! The interview screen renders a projection of the session state; the error
//! screen displays fatal failures full-screen.

pub mod error;
pub mod interview;

pub use error::ErrorScreen;
pub use interview::{InterviewCommand, InterviewTui};
