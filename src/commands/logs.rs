//! Print the tail of the application log.

use anyhow::anyhow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging;

const DEFAULT_LINES: usize = 50;

/// Prints the last [`DEFAULT_LINES`] lines of the newest rotated log file.
///
/// A missing directory or empty file is informative output, not a failure:
/// before the first interview there is simply nothing to show.
///
/// # Errors
/// - If the log directory cannot be determined
/// - If the log file cannot be read
pub fn handle_logs() -> Result<(), anyhow::Error> {
    let log_dir = logging::log_dir()?;

    let Some(log_file) = newest_log(&log_dir)? else {
        println!("No log files yet in: {}", log_dir.display());
        println!("They appear once an interview has run.");
        return Ok(());
    };

    let content =
        fs::read_to_string(&log_file).map_err(|e| anyhow!("Failed to read log file: {e}"))?;

    if content.is_empty() {
        println!("Log file is empty: {}", log_file.display());
        return Ok(());
    }

    let lines: Vec<&str> = content.lines().collect();
    let skipped = lines.len().saturating_sub(DEFAULT_LINES);

    println!();
    if skipped > 0 {
        println!("Showing last {} of {} lines:", DEFAULT_LINES, lines.len());
    } else {
        println!("Showing all {} lines:", lines.len());
    }
    println!("Full log file at: {}", log_file.display());
    println!();

    for line in &lines[skipped..] {
        println!("{line}");
    }

    Ok(())
}

/// The most recently modified log file in the directory, if any.
fn newest_log(log_dir: &Path) -> Result<Option<PathBuf>, anyhow::Error> {
    if !log_dir.exists() {
        return Ok(None);
    }

    let newest = fs::read_dir(log_dir)
        .map_err(|e| anyhow!("Failed to read log directory: {e}"))?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if !path.file_name()?.to_str()?.contains("intervu.log") {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path);

    Ok(newest)
}
