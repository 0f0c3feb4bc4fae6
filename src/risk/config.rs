use primitive_types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{FixedPoint, Ray, Wad};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid risk config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("comfort multiplier must be at least 1, got {0}")]
    ComfortBelowOne(FixedPoint<Ray>),
    #[error("seconds_per_year must be positive")]
    ZeroYear,
}

/// Display and admission policy. None of these are ledger invariants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskCfg {
    /// A position is shown as safe once its ratio reaches
    /// `comfort_multiplier * liquidation_ratio`.
    pub comfort_multiplier: FixedPoint<Ray>,

    /// Proposed deposits whose pooled amount is at or below this are dust.
    pub dust_threshold: FixedPoint<Wad>,

    /// Compounding horizon for the annualized stability fee.
    pub seconds_per_year: u64,
}

impl RiskCfg {
    pub fn standard() -> Self {
        Self {
            comfort_multiplier: FixedPoint::from_integer(2),
            // 0.005 pooled units
            dust_threshold: FixedPoint::from_raw(FixedPoint::<Wad>::scale() / U256::from(200u64)),
            seconds_per_year: 31_536_000,
        }
    }

    /// Parse a JSON document; missing fields keep their `standard()` value.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: RiskCfg = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comfort_multiplier < FixedPoint::one() {
            return Err(ConfigError::ComfortBelowOne(self.comfort_multiplier));
        }
        if self.seconds_per_year == 0 {
            return Err(ConfigError::ZeroYear);
        }
        Ok(())
    }
}

impl Default for RiskCfg {
    fn default() -> Self {
        Self::standard()
    }
}
