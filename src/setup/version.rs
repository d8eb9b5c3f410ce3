//! Config version stamping and comparison.
//!
//! The first line of the config file carries the version that wrote it;
//! comparing it with the running binary's version decides whether setup must
//! regenerate the file.

use anyhow::anyhow;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

/// Version of the running binary, from Cargo.toml.
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A major.minor.patch triple, ordered field by field.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
struct SemanticVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl SemanticVersion {
    /// Parse a version string like "0.1.0" into a SemanticVersion
    fn parse(version_str: &str) -> anyhow::Result<Self> {
        let mut parts = version_str.trim().split('.');

        let mut next_component = |label: &str| {
            parts
                .next()
                .ok_or_else(|| anyhow!("Version '{version_str}' is missing its {label} component"))
                .and_then(|part| {
                    part.parse::<u32>()
                        .map_err(|_| anyhow!("Invalid {label} version component: '{part}'"))
                })
        };

        let version = SemanticVersion {
            major: next_component("major")?,
            minor: next_component("minor")?,
            patch: next_component("patch")?,
        };

        if parts.next().is_some() {
            return Err(anyhow!(
                "Invalid version format: '{version_str}'. Expected 'major.minor.patch'"
            ));
        }

        Ok(version)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extracts the stamped version from the first line of the config file,
/// expected as `config_version = "X.Y.Z"`.
///
/// # Errors
/// Returns an error if the file can't be read.
fn stamped_version(config_path: &Path) -> anyhow::Result<Option<String>> {
    let content = std::fs::read_to_string(config_path)?;
    let Some(first_line) = content.lines().next() else {
        return Ok(None);
    };

    let regex = Regex::new(r#"^\s*config_version\s*=\s*"([^"]+)""#)?;
    Ok(regex
        .captures(first_line)
        .map(|caps| caps[1].to_string()))
}

/// Decides whether setup must regenerate the config file.
///
/// Returns the stamped version when it is older than the binary (or a
/// placeholder when the file predates version stamping), and `None` when the
/// file is absent or current. A config stamped by a NEWER binary is left
/// alone so a downgrade does not wipe settings.
pub fn check_setup_needed(config_path: &Path) -> anyhow::Result<Option<String>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let Some(config_version) = stamped_version(config_path)? else {
        return Ok(Some("unknown (legacy config)".to_string()));
    };

    let stamped = SemanticVersion::parse(&config_version)?;
    let current = SemanticVersion::parse(CURRENT_VERSION)?;

    match stamped.cmp(&current) {
        Ordering::Less => Ok(Some(config_version)),
        Ordering::Equal => Ok(None),
        Ordering::Greater => {
            tracing::warn!(
                "Config version {config_version} is newer than app version {CURRENT_VERSION}"
            );
            Ok(None)
        }
    }
}

/// Rewrites the config file with the current version stamped into its first
/// line, keeping everything except any previous stamp.
pub fn update_config_version(config_path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(config_path)?;

    let kept: Vec<&str> = content
        .lines()
        .filter(|line| !line.trim().starts_with("config_version"))
        .collect();

    let stamp = format!(r#"config_version = "{CURRENT_VERSION}""#);
    let new_content = if kept.is_empty() {
        stamp
    } else {
        format!("{stamp}\n{}", kept.join("\n"))
    };

    std::fs::write(config_path, new_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_version_parse() {
        let v = SemanticVersion::parse("0.1.7").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (0, 1, 7));
        assert_eq!(v.to_string(), "0.1.7");
    }

    #[test]
    fn test_semantic_version_ordering() {
        let older = SemanticVersion::parse("0.0.9").unwrap();
        let newer = SemanticVersion::parse("0.1.0").unwrap();
        assert!(older < newer);
        assert!(newer < SemanticVersion::parse("1.0.0").unwrap());
    }

    #[test]
    fn test_invalid_version_format() {
        assert!(SemanticVersion::parse("0.1").is_err());
        assert!(SemanticVersion::parse("0.1.0.0").is_err());
        assert!(SemanticVersion::parse("one.two.three").is_err());
    }
}
