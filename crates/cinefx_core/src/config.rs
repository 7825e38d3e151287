//! Coordinator Configuration

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{EffectError, EffectResult};

/// Valid bass boost / virtualizer strengths
pub const STRENGTH_RANGE: RangeInclusive<i16> = 0..=1000;

/// Loudness gain range (mB) offered by the effects panel slider
pub const LOUDNESS_GAIN_RANGE: RangeInclusive<i32> = 0..=1000;

/// Effect state the coordinator starts from
///
/// Effect preferences are not persisted: every process starts here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDefaults {
    pub eq_enabled: bool,
    pub bass_enabled: bool,
    pub virtualizer_enabled: bool,
    pub loudness_enabled: bool,
    pub bass_strength: i16,
    pub virtualizer_strength: i16,
    pub loudness_gain_mb: i32,
}

impl Default for EffectDefaults {
    fn default() -> Self {
        Self {
            eq_enabled: true,
            bass_enabled: false,
            virtualizer_enabled: false,
            loudness_enabled: false,
            bass_strength: 0,
            virtualizer_strength: 0,
            loudness_gain_mb: 0,
        }
    }
}

/// Overall coordinator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Initial effect state
    pub defaults: EffectDefaults,

    /// Snapshots queued per subscriber before the oldest is dropped
    pub subscriber_capacity: usize,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            defaults: EffectDefaults::default(),
            subscriber_capacity: 16,
        }
    }
}

impl EffectConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> EffectResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EffectResult<()> {
        if !STRENGTH_RANGE.contains(&self.defaults.bass_strength) {
            return Err(EffectError::ConfigError(format!(
                "bass_strength {} outside 0-1000",
                self.defaults.bass_strength
            )));
        }
        if !STRENGTH_RANGE.contains(&self.defaults.virtualizer_strength) {
            return Err(EffectError::ConfigError(format!(
                "virtualizer_strength {} outside 0-1000",
                self.defaults.virtualizer_strength
            )));
        }
        if self.subscriber_capacity == 0 {
            return Err(EffectError::ConfigError(
                "subscriber_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EffectConfig::default();
        assert!(config.defaults.eq_enabled);
        assert!(!config.defaults.bass_enabled);
        assert!(!config.defaults.virtualizer_enabled);
        assert!(!config.defaults.loudness_enabled);
        assert_eq!(config.defaults.bass_strength, 0);
        assert_eq!(config.subscriber_capacity, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = EffectConfig::default();
        config.defaults.bass_strength = 1001;
        assert!(config.validate().is_err());

        let mut config = EffectConfig::default();
        config.defaults.virtualizer_strength = -5;
        assert!(config.validate().is_err());

        let config = EffectConfig {
            subscriber_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{ "defaults": { "bass_enabled": true, "bass_strength": 300 } }"#;
        let config = EffectConfig::from_json(json).unwrap();
        assert!(config.defaults.bass_enabled);
        assert_eq!(config.defaults.bass_strength, 300);
        // Untouched fields keep their defaults
        assert!(config.defaults.eq_enabled);
        assert_eq!(config.subscriber_capacity, 16);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            EffectConfig::from_json(r#"{ "subscriber_capacity": 0 }"#),
            Err(EffectError::ConfigError(_))
        ));
        assert!(matches!(
            EffectConfig::from_json("{ not json"),
            Err(EffectError::Serialization(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = EffectConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EffectConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_ui_ranges() {
        assert_eq!(*STRENGTH_RANGE.end(), 1000);
        assert!(LOUDNESS_GAIN_RANGE.contains(&0));
        assert!(!LOUDNESS_GAIN_RANGE.contains(&-1));
    }
}
