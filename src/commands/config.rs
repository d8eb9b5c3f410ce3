//! Edit the configuration file in the user's editor.

use std::process::Command;

use crate::config;

/// Editors tried when neither $VISUAL nor $EDITOR is set.
const FALLBACK_EDITORS: [&str; 2] = ["nano", "vi"];

/// Opens the intervu configuration file in the user's preferred editor and
/// waits for it to exit.
///
/// # Errors
/// - If no editor can be found or executed
/// - If the editor exits with a failure status
pub fn handle_config() -> anyhow::Result<()> {
    let config_path = config::config_path()?;
    let editor = pick_editor()?;

    tracing::info!(
        "Editing {} with '{}'",
        config_path.display(),
        editor
    );

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to open editor '{editor}': {e}. Make sure the editor is installed and accessible."
            )
        })?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor exited with error code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    Ok(())
}

/// Resolves the editor: $VISUAL, then $EDITOR, then the first fallback found
/// on PATH.
fn pick_editor() -> anyhow::Result<String> {
    let configured = ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|editor| !editor.trim().is_empty());
    if let Some(editor) = configured {
        return Ok(editor);
    }

    FALLBACK_EDITORS
        .iter()
        .find(|editor| on_path(editor))
        .map(|editor| editor.to_string())
        .ok_or_else(|| {
            anyhow::anyhow!("No editor found. Please set the $EDITOR environment variable.")
        })
}

fn on_path(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
