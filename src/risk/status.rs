use serde::{Deserialize, Serialize};

use crate::math::{CollateralRatio, FixedPoint, Ray};
use crate::oracle::SystemParameters;
use crate::risk::RiskCfg;
use crate::services::metrics::{Metric, Metrics};
use crate::types::{LedgerSafety, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Closed,
    Unavailable,
    Pending,
    Safe,
    Risky,
    Unsafe,
}

/// Where a finite ratio sits relative to the comfort threshold.
enum Comfort {
    Pending,
    NotApplicable,
    Above,
    Below,
}

/// `comfort_multiplier * liquidation_ratio`: the ratio from which a
/// position is displayed as safe rather than risky.
pub fn comfort_threshold(params: &SystemParameters, cfg: &RiskCfg) -> Metric<FixedPoint<Ray>> {
    match params.liquidation_ratio {
        None => Metric::Pending,
        Some(mat) => cfg
            .comfort_multiplier
            .mul(mat)
            .map_or(Metric::NotApplicable, Metric::Value),
    }
}

fn comfort(metrics: &Metrics, params: &SystemParameters, cfg: &RiskCfg) -> Comfort {
    let ratio = match metrics.collateralization_ratio {
        Metric::Pending => return Comfort::Pending,
        Metric::NotApplicable => return Comfort::NotApplicable,
        Metric::Value(CollateralRatio::Infinite) => return Comfort::Above,
        Metric::Value(CollateralRatio::Finite(r)) => r,
    };
    match comfort_threshold(params, cfg) {
        Metric::Pending => Comfort::Pending,
        Metric::NotApplicable => Comfort::NotApplicable,
        Metric::Value(t) if ratio >= t => Comfort::Above,
        Metric::Value(_) => Comfort::Below,
    }
}

/// Map a position to its display status.
///
/// Arms are checked top to bottom: a closed position is `Closed` whatever
/// else holds, and an untrustworthy feed is `Unavailable` before any
/// ratio is looked at.
pub fn classify(
    position: &Position,
    metrics: &Metrics,
    params: &SystemParameters,
    cfg: &RiskCfg,
) -> Status {
    let feed_ok = params.feed_valid && !params.shutdown;

    match (position.is_closed(), feed_ok, position.safety) {
        (true, _, _) => Status::Closed,
        (false, false, _) | (false, true, LedgerSafety::Unresolved) => Status::Unavailable,
        (false, true, LedgerSafety::NotLoaded) => Status::Pending,
        (false, true, LedgerSafety::Reported(_)) if position.debt.is_zero() => Status::Safe,
        (false, true, LedgerSafety::Reported(false)) => Status::Unsafe,
        (false, true, LedgerSafety::Reported(true)) => match comfort(metrics, params, cfg) {
            Comfort::Pending => Status::Pending,
            Comfort::NotApplicable => Status::Unavailable,
            Comfort::Above => Status::Safe,
            Comfort::Below => Status::Risky,
        },
    }
}
