//! Host settings
//!
//! Persisted separately from progress, as a JSON file next to the game.
//! Every field is optional in the file; missing ones keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::{COUNTDOWN_SAMPLE_SECS, TICK_MS};
use crate::persistence::FileStore;

/// Game host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Progress file location
    pub progress_path: PathBuf,
    /// Simulation period in milliseconds
    pub tick_ms: u64,
    /// How often the level clock is updated, in milliseconds
    pub countdown_sample_ms: u64,
    /// Fixed seed for reproducible runs (time-derived when absent)
    pub seed: Option<u64>,
    /// Let the game fly itself
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            progress_path: PathBuf::from(FileStore::DEFAULT_PATH),
            tick_ms: TICK_MS,
            countdown_sample_ms: (COUNTDOWN_SAMPLE_SECS * 1000.0) as u64,
            seed: None,
            autopilot: false,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const DEFAULT_PATH: &'static str = "gapflight.json";

    /// Load settings, falling back to defaults if the file is absent or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Settings file {} is malformed ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("encoding settings")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Simulation period, never shorter than 1ms
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn countdown_sample_secs(&self) -> f32 {
        self.countdown_sample_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gapflight-settings-{tag}-{}.json", std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.progress_path, PathBuf::from("progress.properties"));
        assert_eq!(settings.tick_ms, 15);
        assert_eq!(settings.countdown_sample_ms, 200);
        assert_eq!(settings.tick_period(), Duration::from_millis(15));
        assert!((settings.countdown_sample_secs() - 0.2).abs() < 1e-6);
        assert_eq!(settings.seed, None);
        assert!(!settings.autopilot);
    }

    #[test]
    fn test_missing_file_is_default() {
        assert_eq!(Settings::load(temp_file("missing")), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_file("partial");
        fs::write(&path, r#"{ "seed": 42, "autopilot": true }"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.seed, Some(42));
        assert!(settings.autopilot);
        assert_eq!(settings.tick_ms, 15);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_default() {
        let path = temp_file("malformed");
        fs::write(&path, "tick_ms = 3").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_file("round-trip");
        let settings = Settings {
            progress_path: PathBuf::from("/tmp/p.properties"),
            tick_ms: 20,
            countdown_sample_ms: 100,
            seed: Some(7),
            autopilot: true,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let settings = Settings {
            tick_ms: 0,
            ..Default::default()
        };
        assert_eq!(settings.tick_period(), Duration::from_millis(1));
    }
}
