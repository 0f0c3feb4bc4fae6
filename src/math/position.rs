//! Per-position formulas. Each one is a single rational expression over the
//! raw integers: numerator and denominator are multiplied out at 512 bits
//! and divided once, so no intermediate truncation can push a result past
//! its exact value.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::math::fixed::{FixedPoint, Ray, Wad};
use crate::math::rounding::{ArithmeticError, Rounding, div_products};

/// Finite collateralization ratio, or `Infinite` for a debt-free position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollateralRatio {
    Finite(FixedPoint<Ray>),
    Infinite,
}

fn ray() -> U256 {
    FixedPoint::<Ray>::scale()
}

/// `floor(pledged / per)`: raw collateral converted to pooled units.
pub fn pooled_collateral(
    pledged: FixedPoint<Wad>,
    per: FixedPoint<Ray>,
) -> Result<FixedPoint<Wad>, ArithmeticError> {
    div_products(&[pledged.raw(), ray()], &[per.raw()], Rounding::Floor).map(FixedPoint::from_raw)
}

/// `floor(pooled * tag / (mat * par))`
pub fn max_issuable_debt(
    pooled: FixedPoint<Wad>,
    tag: FixedPoint<Ray>,
    mat: FixedPoint<Ray>,
    par: FixedPoint<Ray>,
) -> Result<FixedPoint<Wad>, ArithmeticError> {
    div_products(
        &[pooled.raw(), tag.raw(), ray()],
        &[mat.raw(), par.raw()],
        Rounding::Floor,
    )
    .map(FixedPoint::from_raw)
}

/// Raw collateral needed to draw `debt`:
/// `nearest(debt * mat * par / tag * per)`.
///
/// Advisory only, hence nearest rounding on the final digit.
pub fn min_required_collateral(
    debt: FixedPoint<Wad>,
    tag: FixedPoint<Ray>,
    per: FixedPoint<Ray>,
    mat: FixedPoint<Ray>,
    par: FixedPoint<Ray>,
) -> Result<FixedPoint<Wad>, ArithmeticError> {
    div_products(
        &[debt.raw(), mat.raw(), par.raw(), per.raw()],
        &[tag.raw(), ray(), ray()],
        Rounding::Nearest,
    )
    .map(FixedPoint::from_raw)
}

/// `floor(pooled * tag / (debt * par))`, infinite when there is no debt.
pub fn collateralization_ratio(
    pooled: FixedPoint<Wad>,
    debt: FixedPoint<Wad>,
    tag: FixedPoint<Ray>,
    par: FixedPoint<Ray>,
) -> Result<CollateralRatio, ArithmeticError> {
    if debt.is_zero() {
        return Ok(CollateralRatio::Infinite);
    }
    div_products(
        &[pooled.raw(), tag.raw(), ray()],
        &[debt.raw(), par.raw()],
        Rounding::Floor,
    )
    .map(|raw| CollateralRatio::Finite(FixedPoint::from_raw(raw)))
}

/// Pooled-collateral price at which the ratio would reach `mat`:
/// `nearest(debt * par * mat / pooled)`. `None` without collateral or
/// without debt.
pub fn liquidation_price(
    pooled: FixedPoint<Wad>,
    debt: FixedPoint<Wad>,
    par: FixedPoint<Ray>,
    mat: FixedPoint<Ray>,
) -> Result<Option<FixedPoint<Ray>>, ArithmeticError> {
    if pooled.is_zero() || debt.is_zero() {
        return Ok(None);
    }
    div_products(
        &[debt.raw(), par.raw(), mat.raw()],
        &[pooled.raw(), ray()],
        Rounding::Nearest,
    )
    .map(|raw| Some(FixedPoint::from_raw(raw)))
}
