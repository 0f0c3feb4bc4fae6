use serde::{Deserialize, Serialize};

use crate::math::{FixedPoint, Ray, Wad};

/// Snapshot of ledger-wide parameters. A `None` field has not been
/// loaded yet; metrics that need it report `Pending`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemParameters {
    /// Price of one pooled-collateral unit in debt-peg units ("tag").
    pub collateral_price: Option<FixedPoint<Ray>>,
    /// Raw collateral per pooled unit ("per").
    pub pooled_collateral_price: Option<FixedPoint<Ray>>,
    /// Target price of the debt unit ("par").
    pub debt_peg_rate: Option<FixedPoint<Ray>>,
    /// Minimum collateralization ratio ("mat"), e.g. 1.5.
    pub liquidation_ratio: Option<FixedPoint<Ray>>,
    /// Penalty multiplier on liquidation ("axe"), e.g. 1.13.
    pub liquidation_penalty: Option<FixedPoint<Wad>>,
    /// Per-second accrual multiplier ("fee").
    pub stability_fee_per_second: Option<FixedPoint<Ray>>,
    pub debt_ceiling: Option<FixedPoint<Wad>>,
    pub total_debt_issued: Option<FixedPoint<Wad>>,
    /// Whether the price oracle currently holds a usable value.
    pub feed_valid: bool,
    /// Global settlement has been triggered.
    pub shutdown: bool,
}

impl SystemParameters {
    /// The collateral price, unless the oracle has flagged it unusable.
    pub fn usable_collateral_price(&self) -> Option<FixedPoint<Ray>> {
        if self.feed_valid {
            self.collateral_price
        } else {
            None
        }
    }
}

/// Source of parameter snapshots, refreshed by the host application on
/// every update tick.
pub trait ParameterFeed {
    fn snapshot(&self) -> Result<SystemParameters, String>;
}
