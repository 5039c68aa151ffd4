//! Configuration for cursor-verify.

use crate::core::classifier::DEFAULT_THRESHOLD_DEGREES;
use crate::core::controller::{DetectionSettings, DEFAULT_COOLDOWN};
use crate::core::sampler::{
    SamplerSettings, DEFAULT_POLL_INTERVAL, DEFAULT_SAMPLE_COUNT, DEFAULT_SAMPLE_INTERVAL,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Main configuration for a detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples captured per attempt
    pub sample_count: usize,

    /// Minimum spacing between accepted samples
    #[serde(rename = "sample_interval_ms", with = "duration_ms")]
    pub sample_interval: Duration,

    /// Spacing between polls of the position source
    #[serde(rename = "poll_interval_ms", with = "duration_ms")]
    pub poll_interval: Duration,

    /// Angles strictly below this count as sharp
    pub threshold_degrees: f64,

    /// Pause between a bot-like attempt and the next
    #[serde(rename = "cooldown_ms", with = "duration_ms")]
    pub cooldown: Duration,

    /// Give up after this many attempts (unbounded when absent)
    pub max_attempts: Option<u32>,

    /// Give up on a capture that takes longer than this (no limit when absent)
    #[serde(rename = "capture_timeout_ms", with = "option_duration_ms")]
    pub capture_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            threshold_degrees: DEFAULT_THRESHOLD_DEGREES,
            cooldown: DEFAULT_COOLDOWN,
            max_attempts: None,
            capture_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does
    /// not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cursor-verify")
            .join("config.json")
    }

    /// Reject values the detection loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count < 3 {
            return Err(ConfigError::Invalid(format!(
                "sample_count must be at least 3 to measure an angle, got {}",
                self.sample_count
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        validate_threshold(self.threshold_degrees)?;
        if self.max_attempts == Some(0) {
            return Err(ConfigError::Invalid(
                "max_attempts must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings for the retry controller.
    pub fn settings(&self) -> DetectionSettings {
        DetectionSettings {
            sampler: SamplerSettings {
                sample_count: self.sample_count,
                sample_interval: self.sample_interval,
                poll_interval: self.poll_interval,
                capture_timeout: self.capture_timeout,
            },
            threshold_degrees: self.threshold_degrees,
            cooldown: self.cooldown,
            max_attempts: self.max_attempts,
        }
    }

    /// Polls needed for a held position to clear the sample interval.
    pub fn polls_per_sample(&self) -> usize {
        if self.poll_interval.is_zero() {
            return 1;
        }
        let poll = self.poll_interval.as_nanos();
        let polls = (self.sample_interval.as_nanos() + poll - 1) / poll;
        usize::try_from(polls).unwrap_or(usize::MAX).max(1)
    }
}

/// Check that a sharp-angle threshold lies in `(0, 180]`.
pub fn validate_threshold(degrees: f64) -> Result<(), ConfigError> {
    if degrees > 0.0 && degrees <= 180.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "threshold_degrees must be in (0, 180], got {degrees}"
        )))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Serde support for Duration as whole milliseconds.
pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Serde support for Option<Duration> as whole milliseconds or null.
pub(crate) mod option_duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration
            .map(|d| d.as_millis() as u64)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cursor-verify-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sample_count, 5);
        assert_eq!(config.sample_interval, Duration::from_millis(50));
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.threshold_degrees, 45.0);
        assert_eq!(config.cooldown, Duration::from_millis(500));
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.capture_timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_uses_milliseconds() {
        let config = Config {
            capture_timeout: Some(Duration::from_secs(3)),
            ..Config::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["sample_interval_ms"], 50);
        assert_eq!(json["cooldown_ms"], 500);
        assert_eq!(json["capture_timeout_ms"], 3000);
        assert!(json["max_attempts"].is_null());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"threshold_degrees": 30.0, "max_attempts": 4}"#).unwrap();
        assert_eq!(config.threshold_degrees, 30.0);
        assert_eq!(config.max_attempts, Some(4));
        assert_eq!(config.sample_count, 5);
        assert_eq!(config.capture_timeout, None);
    }

    #[test]
    fn test_validation() {
        let too_few = Config {
            sample_count: 2,
            ..Config::default()
        };
        assert!(matches!(too_few.validate(), Err(ConfigError::Invalid(_))));

        let zero_poll = Config {
            poll_interval: Duration::ZERO,
            ..Config::default()
        };
        assert!(zero_poll.validate().is_err());

        let bad_threshold = Config {
            threshold_degrees: 0.0,
            ..Config::default()
        };
        assert!(bad_threshold.validate().is_err());

        let nan_threshold = Config {
            threshold_degrees: f64::NAN,
            ..Config::default()
        };
        assert!(nan_threshold.validate().is_err());

        let zero_attempts = Config {
            max_attempts: Some(0),
            ..Config::default()
        };
        assert!(zero_attempts.validate().is_err());
    }

    #[test]
    fn test_threshold_range() {
        assert!(validate_threshold(45.0).is_ok());
        assert!(validate_threshold(180.0).is_ok());
        assert!(validate_threshold(-5.0).is_err());
        assert!(validate_threshold(0.0).is_err());
        assert!(validate_threshold(180.5).is_err());
        assert!(matches!(
            validate_threshold(f64::NAN),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_settings_conversion() {
        let config = Config {
            sample_count: 7,
            max_attempts: Some(3),
            ..Config::default()
        };
        let settings = config.settings();
        assert_eq!(settings.sampler.sample_count, 7);
        assert_eq!(settings.max_attempts, Some(3));
        assert_eq!(settings.cooldown, Duration::from_millis(500));
    }

    #[test]
    fn test_polls_per_sample() {
        assert_eq!(Config::default().polls_per_sample(), 5);
        let uneven = Config {
            sample_interval: Duration::from_millis(55),
            ..Config::default()
        };
        assert_eq!(uneven.polls_per_sample(), 6);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_path("config.json");
        let config = Config {
            threshold_degrees: 60.0,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let loaded = Config::load_from(&temp_path("does-not-exist.json")).unwrap();
        assert_eq!(loaded, Config::default());
    }
}
