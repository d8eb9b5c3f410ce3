//! Structured logging for intervu using the tracing crate.
//!
//! Writes to daily-rotated log files under the XDG state directory and never
//! to the terminal, which belongs to the TUI. Old log files are pruned at
//! startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;

/// Base name of the rotated log files.
const LOG_FILE_PREFIX: &str = "intervu.log";

/// Days of rotated logs kept on disk.
const MAX_LOG_FILES: usize = 7;

/// Keeps the non-blocking appender's worker alive for the program lifetime.
static APPENDER_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Sets up file-only logging; the terminal stays free for the TUI.
///
/// The level comes from RUST_LOG and defaults to "info".
///
/// # Errors
/// - If the log directory cannot be determined or created
/// - If a subscriber was already installed
pub fn init_logging() -> Result<(), anyhow::Error> {
    let log_dir = log_dir()?;

    if let Err(e) = prune_old_logs(&log_dir) {
        eprintln!("Warning: Failed to prune old logs: {e}");
    }

    let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    APPENDER_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Logging already initialized"))?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true),
        )
        .init();

    tracing::debug!("Logging initialized. Log directory: {}", log_dir.display());
    Ok(())
}

/// The log directory: `$XDG_STATE_HOME/intervu`, or `~/.local/state/intervu`
/// when the variable is unset.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the directory cannot be created
pub fn log_dir() -> Result<PathBuf, anyhow::Error> {
    let log_dir = match std::env::var("XDG_STATE_HOME") {
        Ok(xdg_state) => PathBuf::from(xdg_state).join("intervu"),
        Err(_) => dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(".local/state/intervu"),
    };

    fs::create_dir_all(&log_dir)?;

    Ok(log_dir)
}

/// Removes rotated log files beyond the retention window.
///
/// Only files matching `intervu.log.YYYY-MM-DD` are considered; the newest
/// [`MAX_LOG_FILES`] are kept.
///
/// # Errors
/// - If the log directory cannot be read
fn prune_old_logs(log_dir: &Path) -> Result<(), anyhow::Error> {
    let mut log_files: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let file_name = path.file_name()?.to_str()?;
            if !file_name.starts_with(LOG_FILE_PREFIX) || file_name.matches('-').count() != 2 {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((modified, path))
        })
        .collect();

    // Newest first; everything past the retention window goes.
    log_files.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, path) in log_files.into_iter().skip(MAX_LOG_FILES) {
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!("Failed to delete old log file {}: {}", path.display(), e);
        }
    }

    Ok(())
}
