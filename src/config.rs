//! Engine configuration

use rate_model::{
    would_overflow_multiply, BpsLimits, StepMode, BPS_SCALE, MAX_BPS_ADJUSTMENT, MAX_RATE,
    MAX_STEP_BPS,
};
use serde::{Deserialize, Serialize};

use crate::error::{RateError, Result};
use crate::serde_utils;
use crate::Epoch;

/// Deployment-wide pricing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Step function flavour
    pub step_mode: StepMode,

    /// Epochs a compact update stays valid
    pub valid_duration_epochs: Epoch,

    /// Largest rate `add_bps` accepts
    #[serde(with = "serde_utils::u128_string")]
    pub max_rate: u128,

    /// Largest positive bps `add_bps` accepts
    #[serde(with = "serde_utils::i128_string")]
    pub max_bps_adjustment: i128,

    /// Largest step function value
    #[serde(with = "serde_utils::i128_string")]
    pub max_step_bps: i128,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_mode: StepMode::Enhanced,
            valid_duration_epochs: 1000,
            max_rate: MAX_RATE,
            max_bps_adjustment: MAX_BPS_ADJUSTMENT,
            max_step_bps: MAX_STEP_BPS,
        }
    }
}

impl EngineConfig {
    pub fn legacy() -> Self {
        Self {
            step_mode: StepMode::Legacy,
            ..Self::default()
        }
    }

    pub fn enhanced() -> Self {
        Self::default()
    }

    pub fn bps_limits(&self) -> BpsLimits {
        BpsLimits {
            max_rate: self.max_rate,
            max_bps: self.max_bps_adjustment,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_bps_adjustment < 0 {
            return Err(RateError::InvalidConfig("max_bps_adjustment must be non-negative"));
        }
        let max_rate = i128::try_from(self.max_rate)
            .map_err(|_| RateError::InvalidConfig("max_rate does not fit a signed 128-bit value"))?;
        let factor = BPS_SCALE
            .checked_add(self.max_bps_adjustment)
            .ok_or(RateError::InvalidConfig("max_bps_adjustment too large"))?;
        if would_overflow_multiply(max_rate, factor) {
            return Err(RateError::InvalidConfig(
                "max_rate * (10000 + max_bps_adjustment) overflows",
            ));
        }
        if self.max_step_bps < 0 || self.max_step_bps > self.max_bps_adjustment {
            return Err(RateError::InvalidConfig(
                "max_step_bps must be within [0, max_bps_adjustment]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.step_mode, StepMode::Enhanced);
        assert_eq!(EngineConfig::legacy().step_mode, StepMode::Legacy);
        assert_eq!(config.bps_limits(), BpsLimits::DEFAULT);
    }

    #[test]
    fn test_overflowing_limits_rejected() {
        let config = EngineConfig {
            max_rate: u128::MAX / 2,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(RateError::InvalidConfig(_))));

        let config = EngineConfig {
            max_bps_adjustment: -1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            max_bps_adjustment: 100,
            max_step_bps: 101,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            step_mode = "legacy"
            valid_duration_epochs = 20
            max_rate = "1_000_000_000_000_000_000_000_000"
            "#,
        )
        .unwrap();
        assert_eq!(config.step_mode, StepMode::Legacy);
        assert_eq!(config.valid_duration_epochs, 20);
        assert_eq!(config.max_rate, MAX_RATE);
        assert_eq!(config.max_step_bps, MAX_STEP_BPS);
    }
}
