// maulog - GPL-3.0-or-later
// This file is part of maulog.
//
// Copyright (C) 2025 Daniel Freiermuth
//
// maulog is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// maulog is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with maulog.  If not, see <https://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where MAU writes its logs on macOS
pub const DEFAULT_LOG_DIRECTORY: &str = "/Library/Logs/Microsoft";
pub const DEFAULT_LOG_SUFFIX: &str = ".log";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Monitor configuration, stored as JSON in the user's config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Directory scanned by "load most recent"
    pub log_directory: PathBuf,

    /// Only files whose name ends with this are considered
    pub log_suffix: String,

    /// How often the watched file is checked for growth
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
            log_suffix: DEFAULT_LOG_SUFFIX.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl MonitorConfig {
    /// Get the path to the user config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("maulog").join("config.json"))
    }

    /// Load the user config, returning defaults if missing or malformed
    pub fn load() -> Self {
        Self::config_path().map_or_else(Self::default, |path| Self::load_from(&path))
    }

    /// Load config from a specific file, returning defaults if missing or malformed
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("No config found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => {
                    tracing::info!(
                        "Loaded config from {}: watching '*{}' in {}",
                        path.display(),
                        config.log_suffix,
                        config.log_directory.display()
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Cannot read config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.log_directory, PathBuf::from("/Library/Logs/Microsoft"));
        assert_eq!(config.log_suffix, ".log");
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"log_directory":"/tmp/mau","poll_interval_ms":50}"#)
            .expect("write config");

        let config = MonitorConfig::load_from(&path);
        assert_eq!(config.log_directory, PathBuf::from("/tmp/mau"));
        assert_eq!(config.log_suffix, ".log");
        assert_eq!(config.poll_interval_ms, 50);
    }

    #[test]
    fn test_missing_or_malformed_config_is_default() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let missing = dir.path().join("nope.json");
        assert_eq!(MonitorConfig::load_from(&missing), MonitorConfig::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").expect("write config");
        assert_eq!(MonitorConfig::load_from(&broken), MonitorConfig::default());
    }
}
