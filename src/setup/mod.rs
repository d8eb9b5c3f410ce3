//! First-run setup and configuration migration.
//!
//! A fresh install gets a default config file stamped with the application
//! version; a config written by an older version is regenerated on the next
//! start.

pub mod version;

use crate::config::{self, IntervuConfig};

/// Current application version from Cargo.toml
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Makes sure a current-version config file exists, running setup when it is
/// missing or stale.
///
/// # Errors
/// - If the config path cannot be determined
/// - If setup itself fails
pub fn ensure_current_config() -> anyhow::Result<()> {
    let config_path = config::config_path()?;

    if !config_path.exists() {
        tracing::info!("No configuration found, running first-time setup");
        return run_setup();
    }

    let Some(old_version) = version::check_setup_needed(&config_path)? else {
        tracing::debug!("Config version up to date ({CURRENT_VERSION})");
        return Ok(());
    };

    tracing::info!("Migrating configuration from version {old_version} to {CURRENT_VERSION}");
    run_setup()?;
    version::update_config_version(&config_path)?;
    tracing::info!("Migration to version {CURRENT_VERSION} complete");
    Ok(())
}

/// Writes the default configuration, stamped with the application version.
///
/// Existing settings are not preserved; setup only runs when the config is
/// absent or from an older version.
///
/// # Errors
/// Returns an error if any file operations fail.
pub fn run_setup() -> anyhow::Result<()> {
    let config_path = config::config_path()?;

    let default_config = toml::to_string_pretty(&IntervuConfig::default())?;
    let stamped = format!("config_version = \"{CURRENT_VERSION}\"\n{default_config}");
    std::fs::write(&config_path, stamped)?;

    tracing::info!("Wrote default configuration to {}", config_path.display());
    Ok(())
}
