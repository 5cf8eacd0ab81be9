//! Guard configuration shared by the vault and its adapter.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Operational guardrails checked before any position mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Minimum seconds between successive rebalances of the same vault.
    pub min_cooldown_secs: u64,
    /// Minimum range width in ticks.
    pub min_width_ticks: i32,
    /// Maximum range width in ticks.
    pub max_width_ticks: i32,
    /// Maximum allowed distance between spot tick and TWAP tick.
    pub max_twap_deviation_ticks: u32,
    /// Trailing window for the TWAP consult, in seconds.
    pub twap_window_secs: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            min_cooldown_secs: 3600, // 1 hour
            min_width_ticks: 60,
            max_width_ticks: 200_000,
            max_twap_deviation_ticks: 100,
            twap_window_secs: 600, // 10 minutes
        }
    }
}

impl GuardConfig {
    /// Rejects degenerate configurations before they reach a guard check.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.min_width_ticks <= 0 {
            return Err(ConfigurationError::InvalidGuardConfig(
                "min_width_ticks must be positive".into(),
            ));
        }
        if self.max_width_ticks < self.min_width_ticks {
            return Err(ConfigurationError::InvalidGuardConfig(
                "max_width_ticks must be >= min_width_ticks".into(),
            ));
        }
        if self.twap_window_secs == 0 {
            return Err(ConfigurationError::InvalidGuardConfig(
                "twap_window_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GuardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_width_bounds() {
        let config = GuardConfig {
            min_width_ticks: 120,
            max_width_ticks: 60,
            ..GuardConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidGuardConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_twap_window() {
        let config = GuardConfig {
            twap_window_secs: 0,
            ..GuardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = GuardConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GuardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
