use crate::segments::builder::DEFAULT_FALLBACK_WINDOW_SECONDS;
use crate::segments::tracker::DEFAULT_COMPLETION_THRESHOLD;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the chapter progress engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Segmentation and completion settings
    pub segmentation: SegmentationConfig,

    /// Storage settings
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Fraction of a chapter that must be watched before auto-completion
    pub completion_threshold: f64,

    /// Window in seconds granted to the last chapter when the video
    /// duration is unknown
    pub fallback_window_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted completion records
    pub data_dir: PathBuf,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
            fallback_window_seconds: DEFAULT_FALLBACK_WINDOW_SECONDS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("progress"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            segmentation: SegmentationConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_paths = [
            "chapter-progress.toml",
            "config/chapter-progress.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        config.validate()?;
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        // Try environment variables
        if let Ok(config) = Self::from_env() {
            config.validate()?;
            return Ok(config);
        }

        Err(anyhow!("No configuration file found"))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        let mut found = false;

        if let Ok(data_dir) = std::env::var("CHAPTER_PROGRESS_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(data_dir);
            found = true;
        }

        if let Ok(threshold) = std::env::var("CHAPTER_PROGRESS_THRESHOLD") {
            config.segmentation.completion_threshold =
                threshold.parse().unwrap_or(DEFAULT_COMPLETION_THRESHOLD);
            found = true;
        }

        if let Ok(window) = std::env::var("CHAPTER_PROGRESS_FALLBACK_WINDOW") {
            config.segmentation.fallback_window_seconds =
                window.parse().unwrap_or(DEFAULT_FALLBACK_WINDOW_SECONDS);
            found = true;
        }

        if found {
            Ok(config)
        } else {
            Err(anyhow!("no environment overrides set"))
        }
    }

    /// Check invariants on configured values
    pub fn validate(&self) -> Result<()> {
        let threshold = self.segmentation.completion_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(anyhow!(
                "completion_threshold must be in (0, 1], got {}",
                threshold
            ));
        }

        if self.segmentation.fallback_window_seconds == 0 {
            return Err(anyhow!("fallback_window_seconds must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.segmentation.completion_threshold, 0.90);
        assert_eq!(config.segmentation.fallback_window_seconds, 600);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = Config::default();
        config.segmentation.completion_threshold = 1.5;
        assert!(config.validate().is_err());

        config.segmentation.completion_threshold = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            parsed.segmentation.completion_threshold,
            config.segmentation.completion_threshold
        );
    }
}
