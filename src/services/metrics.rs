use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::math::position::{self, CollateralRatio};
use crate::math::{ArithmeticError, FixedPoint, Ray, Wad};
use crate::oracle::SystemParameters;
use crate::risk::RiskCfg;
use crate::services::fees;
use crate::types::Subject;

/// A derived value, or the reason there is none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Metric<T> {
    /// An input has not been loaded yet.
    Pending,
    /// The value does not exist for this position (no collateral, system
    /// shut down, degenerate parameters).
    NotApplicable,
    Value(T),
}

impl<T> Metric<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Metric::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Metric::Pending)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Metric<U> {
        match self {
            Metric::Pending => Metric::Pending,
            Metric::NotApplicable => Metric::NotApplicable,
            Metric::Value(v) => Metric::Value(f(v)),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Metric<U>) -> Metric<U> {
        match self {
            Metric::Pending => Metric::Pending,
            Metric::NotApplicable => Metric::NotApplicable,
            Metric::Value(v) => f(v),
        }
    }
}

impl<T> From<Option<T>> for Metric<T> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Metric::NotApplicable, Metric::Value)
    }
}

/// Everything the dashboard derives for one position or proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub pooled_collateral: Metric<FixedPoint<Wad>>,
    pub max_issuable_debt: Metric<FixedPoint<Wad>>,
    /// Raw collateral needed to back the subject's debt.
    pub min_required_collateral: Metric<FixedPoint<Wad>>,
    /// Pooled-collateral price at which the position becomes liquidatable.
    pub liquidation_price: Metric<FixedPoint<Ray>>,
    pub collateralization_ratio: Metric<CollateralRatio>,
    pub annualized_fee_percent: Metric<FixedPoint<Wad>>,
    pub liquidation_penalty_percent: Metric<FixedPoint<Wad>>,
}

fn settle<T>(metric: &'static str, r: Result<T, ArithmeticError>) -> Metric<T> {
    match r {
        Ok(v) => Metric::Value(v),
        Err(ArithmeticError::Overflow) => {
            warn!(metric, "fixed-point overflow, reporting not applicable");
            Metric::NotApplicable
        }
        Err(e) => {
            debug!(metric, error = %e, "reporting not applicable");
            Metric::NotApplicable
        }
    }
}

fn loaded<T>(v: Option<T>) -> Metric<T> {
    v.map_or(Metric::Pending, Metric::Value)
}

/// Derive all metrics for a position or proposal from one parameter
/// snapshot. Pure: identical inputs always give identical output.
pub fn compute_metrics<'a>(
    subject: impl Into<Subject<'a>>,
    params: &SystemParameters,
    cfg: &RiskCfg,
) -> Metrics {
    let subject = subject.into();
    let debt = subject.debt();

    let tag = loaded(params.usable_collateral_price());
    let per = loaded(params.pooled_collateral_price);
    let par = loaded(params.debt_peg_rate);
    let mat = loaded(params.liquidation_ratio);

    let pooled_collateral = match subject {
        Subject::Position(p) => Metric::Value(p.pooled_collateral),
        Subject::Proposal(a) => per.and_then(|per| {
            settle("pooled_collateral", position::pooled_collateral(a.collateral, per))
        }),
    };

    let max_issuable_debt = pooled_collateral.and_then(|pooled| {
        tag.and_then(|tag| {
            mat.and_then(|mat| {
                par.and_then(|par| {
                    settle(
                        "max_issuable_debt",
                        position::max_issuable_debt(pooled, tag, mat, par),
                    )
                })
            })
        })
    });

    let min_required_collateral = tag.and_then(|tag| {
        per.and_then(|per| {
            mat.and_then(|mat| {
                par.and_then(|par| {
                    settle(
                        "min_required_collateral",
                        position::min_required_collateral(debt, tag, per, mat, par),
                    )
                })
            })
        })
    });

    let (collateralization_ratio, liquidation_price) = if params.shutdown {
        (Metric::NotApplicable, Metric::NotApplicable)
    } else {
        let ratio = pooled_collateral.and_then(|pooled| {
            tag.and_then(|tag| {
                par.and_then(|par| {
                    settle(
                        "collateralization_ratio",
                        position::collateralization_ratio(pooled, debt, tag, par),
                    )
                })
            })
        });
        let price = pooled_collateral.and_then(|pooled| {
            par.and_then(|par| {
                mat.and_then(|mat| {
                    settle(
                        "liquidation_price",
                        position::liquidation_price(pooled, debt, par, mat),
                    )
                    .and_then(Metric::from)
                })
            })
        });
        (ratio, price)
    };

    let annualized_fee_percent = loaded(params.stability_fee_per_second).and_then(|fee| {
        settle(
            "annualized_fee_percent",
            fees::annualized_fee_percent(fee, cfg.seconds_per_year),
        )
    });

    let liquidation_penalty_percent = loaded(params.liquidation_penalty).and_then(|axe| {
        settle(
            "liquidation_penalty_percent",
            fees::liquidation_penalty_percent(axe),
        )
    });

    Metrics {
        pooled_collateral,
        max_issuable_debt,
        min_required_collateral,
        liquidation_price,
        collateralization_ratio,
        annualized_fee_percent,
        liquidation_penalty_percent,
    }
}
