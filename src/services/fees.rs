use crate::math::{ArithmeticError, FixedPoint, Ray, Wad, rpow};

/// Annual stability fee in percent: `fee^seconds_per_year * 100 - 100`.
///
/// A per-second multiplier below one would mean a negative fee, which the
/// ledger never configures; it reads as zero.
pub fn annualized_fee_percent(
    fee_per_second: FixedPoint<Ray>,
    seconds_per_year: u64,
) -> Result<FixedPoint<Wad>, ArithmeticError> {
    let hundred = FixedPoint::<Ray>::from_integer(100);
    let compounded = rpow(fee_per_second, seconds_per_year)?;
    compounded.mul_int(100)?.saturating_sub(hundred).rescale()
}

/// Liquidation penalty in percent: `(axe - 1) * 100`.
pub fn liquidation_penalty_percent(
    penalty: FixedPoint<Wad>,
) -> Result<FixedPoint<Wad>, ArithmeticError> {
    penalty.saturating_sub(FixedPoint::one()).mul_int(100)
}
