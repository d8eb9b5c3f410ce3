//! Configuration management for intervu.
//!
//! This module handles loading and saving application configuration from TOML
//! files, plus resolution of API credentials from the environment. The config
//! file lives in the user's config directory; credentials are never written
//! to disk.

pub mod credentials;
pub mod file;

pub use credentials::Credentials;
pub use file::{config_path, IntervuConfig};
