use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::math::{CollateralRatio, FixedPoint, Ray, Wad};
use crate::oracle::SystemParameters;
use crate::risk::{RiskCfg, comfort_threshold};
use crate::services::metrics::{Metric, Metrics, compute_metrics};
use crate::types::ProposedAction;

/// Why a proposed deposit/draw cannot go ahead. All user-correctable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is not available yet")]
    FeedUnavailable(&'static str),

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: FixedPoint<Wad>,
        available: FixedPoint<Wad>,
    },

    #[error("deposit of {pooled} pooled collateral must be above {threshold}")]
    BelowMinimumCollateral {
        pooled: FixedPoint<Wad>,
        threshold: FixedPoint<Wad>,
    },

    #[error("drawing {requested} would exceed the debt ceiling of {ceiling} ({issued} already issued)")]
    DebtCeilingExceeded {
        requested: FixedPoint<Wad>,
        issued: FixedPoint<Wad>,
        ceiling: FixedPoint<Wad>,
    },

    #[error("collateral supports at most {max_issuable} debt, requested {requested}")]
    InsufficientCollateral {
        requested: FixedPoint<Wad>,
        max_issuable: FixedPoint<Wad>,
    },
}

/// Non-blocking advice attached to an accepted proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalWarning {
    /// The resulting ratio is below the comfort threshold.
    NearLiquidation {
        ratio: FixedPoint<Ray>,
        comfort: FixedPoint<Ray>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalAssessment {
    pub metrics: Metrics,
    pub warning: Option<ProposalWarning>,
}

fn require<T>(metric: Metric<T>, what: &'static str) -> Result<T, ValidationError> {
    match metric {
        Metric::Value(v) => Ok(v),
        Metric::Pending | Metric::NotApplicable => Err(ValidationError::FeedUnavailable(what)),
    }
}

/// Reject a non-empty deposit whose pooled amount is dust.
pub fn check_minimum_collateral(
    pooled: FixedPoint<Wad>,
    cfg: &RiskCfg,
) -> Result<(), ValidationError> {
    if pooled <= cfg.dust_threshold {
        return Err(ValidationError::BelowMinimumCollateral {
            pooled,
            threshold: cfg.dust_threshold,
        });
    }
    Ok(())
}

/// System-wide cap: `total_debt_issued + requested <= debt_ceiling`.
pub fn check_debt_ceiling(
    params: &SystemParameters,
    requested: FixedPoint<Wad>,
) -> Result<(), ValidationError> {
    let issued = params
        .total_debt_issued
        .ok_or(ValidationError::FeedUnavailable("total_debt_issued"))?;
    let ceiling = params
        .debt_ceiling
        .ok_or(ValidationError::FeedUnavailable("debt_ceiling"))?;

    let exceeds = match issued.checked_add(requested) {
        Ok(total) => total > ceiling,
        Err(_) => true,
    };
    if exceeds {
        return Err(ValidationError::DebtCeilingExceeded {
            requested,
            issued,
            ceiling,
        });
    }
    Ok(())
}

/// Pre-check for a lock-and-draw proposal (no state mutation).
///
/// Checks run in this order: wallet balance (when known), dust deposit,
/// debt ceiling, collateral sufficiency. The first failure is returned.
/// An accepted proposal may still carry a `NearLiquidation` warning.
pub fn validate_proposal(
    action: &ProposedAction,
    params: &SystemParameters,
    cfg: &RiskCfg,
    wallet_balance: Option<FixedPoint<Wad>>,
) -> Result<ProposalAssessment, ValidationError> {
    let metrics = compute_metrics(action, params, cfg);

    if let Some(available) = wallet_balance {
        if action.collateral > available {
            return Err(ValidationError::InsufficientBalance {
                needed: action.collateral,
                available,
            });
        }
    }

    if !action.collateral.is_zero() {
        let pooled = require(metrics.pooled_collateral, "pooled_collateral_price")?;
        check_minimum_collateral(pooled, cfg)?;
    }

    let mut warning = None;
    if !action.debt.is_zero() {
        check_debt_ceiling(params, action.debt)?;

        let max_issuable = require(metrics.max_issuable_debt, "collateral_price")?;
        if action.debt > max_issuable {
            debug!(requested = %action.debt, max = %max_issuable, "proposal exceeds collateral");
            return Err(ValidationError::InsufficientCollateral {
                requested: action.debt,
                max_issuable,
            });
        }

        if let (Metric::Value(CollateralRatio::Finite(ratio)), Metric::Value(comfort)) =
            (metrics.collateralization_ratio, comfort_threshold(params, cfg))
        {
            if ratio < comfort {
                warning = Some(ProposalWarning::NearLiquidation { ratio, comfort });
            }
        }
    }

    Ok(ProposalAssessment { metrics, warning })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wad(s: &str) -> FixedPoint<Wad> {
        s.parse().unwrap()
    }

    fn ray(s: &str) -> FixedPoint<Ray> {
        s.parse().unwrap()
    }

    fn params() -> SystemParameters {
        SystemParameters {
            collateral_price: Some(ray("300")),
            pooled_collateral_price: Some(ray("1")),
            debt_peg_rate: Some(ray("1")),
            liquidation_ratio: Some(ray("1.5")),
            debt_ceiling: Some(wad("1000")),
            total_debt_issued: Some(wad("800")),
            feed_valid: true,
            ..Default::default()
        }
    }

    fn action(collateral: &str, debt: &str) -> ProposedAction {
        ProposedAction {
            collateral: wad(collateral),
            debt: wad(debt),
        }
    }

    #[test]
    fn comfortable_proposal_passes_without_warning() {
        let res = validate_proposal(&action("1", "50"), &params(), &RiskCfg::standard(), None).unwrap();
        assert_eq!(res.warning, None);
        assert_eq!(res.metrics.max_issuable_debt, Metric::Value(wad("200")));
    }

    #[test]
    fn dust_deposit_is_rejected() {
        let err = validate_proposal(&action("0.004", "0"), &params(), &RiskCfg::standard(), None)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::BelowMinimumCollateral {
                pooled: wad("0.004"),
                threshold: wad("0.005"),
            }
        );
        // exactly at the threshold is still dust
        assert!(matches!(
            validate_proposal(&action("0.005", "0"), &params(), &RiskCfg::standard(), None),
            Err(ValidationError::BelowMinimumCollateral { .. })
        ));
        assert!(validate_proposal(&action("0.006", "0"), &params(), &RiskCfg::standard(), None).is_ok());
    }

    #[test]
    fn debt_ceiling_is_checked_before_collateral() {
        let err = validate_proposal(&action("0.1", "201"), &params(), &RiskCfg::standard(), None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::DebtCeilingExceeded { .. }));
        // reaching the ceiling exactly is allowed
        assert!(check_debt_ceiling(&params(), wad("200")).is_ok());
    }

    #[test]
    fn drawing_above_max_is_rejected() {
        let err = validate_proposal(&action("0.1", "21"), &params(), &RiskCfg::standard(), None)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientCollateral {
                requested: wad("21"),
                max_issuable: wad("20"),
            }
        );
    }

    #[test]
    fn thin_margin_warns() {
        // ratio = 300 / 150 = 2.0 < 3.0
        let res = validate_proposal(&action("1", "150"), &params(), &RiskCfg::standard(), None).unwrap();
        assert_eq!(
            res.warning,
            Some(ProposalWarning::NearLiquidation {
                ratio: ray("2"),
                comfort: ray("3"),
            })
        );
    }

    #[test]
    fn assessment_with_warning_survives_json() {
        let res = validate_proposal(&action("1", "150"), &params(), &RiskCfg::standard(), None).unwrap();
        let json = serde_json::to_value(res).unwrap();
        assert_eq!(json["warning"]["near_liquidation"]["comfort"], "3");
        assert_eq!(serde_json::from_value::<ProposalAssessment>(json).unwrap(), res);
    }

    #[test]
    fn wallet_balance_is_checked_first() {
        let err = validate_proposal(
            &action("2", "0"),
            &params(),
            &RiskCfg::standard(),
            Some(wad("1.5")),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InsufficientBalance { .. }));
    }

    #[test]
    fn missing_inputs_surface_as_feed_unavailable() {
        let mut p = params();
        p.feed_valid = false;
        assert_eq!(
            validate_proposal(&action("1", "10"), &p, &RiskCfg::standard(), None),
            Err(ValidationError::FeedUnavailable("collateral_price"))
        );

        let mut p = params();
        p.debt_ceiling = None;
        assert_eq!(
            validate_proposal(&action("1", "10"), &p, &RiskCfg::standard(), None),
            Err(ValidationError::FeedUnavailable("debt_ceiling"))
        );

        let mut p = params();
        p.pooled_collateral_price = None;
        assert_eq!(
            validate_proposal(&action("1", "0"), &p, &RiskCfg::standard(), None),
            Err(ValidationError::FeedUnavailable("pooled_collateral_price"))
        );
    }
}
