//! Command-line settings - persisted user preferences.
//!
//! Read once at startup from `settings.toml` in the user's config directory,
//! or from the path given with `--config`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fwb_core::WorkbenchConfig;
use fwb_persistence::DEFAULT_SNAPSHOT_NAME;
use serde::{Deserialize, Serialize};

// =============================================================================
// ROOT SETTINGS
// =============================================================================

/// Workbench settings.
///
/// Every section and field is optional in the file; whatever is missing
/// takes its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Recomposition behavior.
    pub session: SessionSettings,

    /// Snapshot file defaults.
    pub snapshot: SnapshotSettings,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    ///
    /// A missing file yields the defaults silently; an unreadable or invalid
    /// one yields the defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Failed to read settings");
                return Self::default();
            }
        };

        toml::from_str(&content).unwrap_or_else(|error| {
            tracing::warn!(path = %path.display(), %error, "Invalid settings; using defaults");
            Self::default()
        })
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "FederationWorkbench", "fwb")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Driver configuration for interactive replay.
    pub fn workbench_config(&self) -> WorkbenchConfig {
        WorkbenchConfig {
            debounce: Duration::from_millis(self.session.debounce_ms),
            offload: self.session.offload,
        }
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Recomposition behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Trailing delay before a document edit triggers recomposition.
    pub debounce_ms: u64,

    /// Compose on a worker task instead of inline.
    pub offload: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            offload: true,
        }
    }
}

/// Snapshot file defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    /// File stem used when no name is given.
    pub default_name: String,

    /// Directory snapshot files are written to.
    pub output_dir: PathBuf,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_SNAPSHOT_NAME.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str("[session]\noffload = false\n").unwrap();

        assert!(!settings.session.offload);
        assert_eq!(settings.session.debounce_ms, 250);
        assert_eq!(settings.snapshot, SnapshotSettings::default());
    }

    #[test]
    fn test_workbench_config_from_settings() {
        let mut settings = Settings::default();
        settings.session.debounce_ms = 40;

        let config = settings.workbench_config();
        assert_eq!(config.debounce, Duration::from_millis(40));
        assert!(config.offload);
    }

    #[test]
    fn test_missing_file_is_default() {
        let settings = Settings::load_from(Path::new("/nonexistent/fwb/settings.toml"));
        assert_eq!(settings, Settings::default());
    }
}
