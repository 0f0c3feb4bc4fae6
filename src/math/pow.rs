use crate::math::fixed::{FixedPoint, Precision};
use crate::math::rounding::ArithmeticError;

/// `x^n` by repeated squaring, each product truncated at the precision of `x`.
///
/// Exponents here are second counts (a year is ~2^25), so the loop runs
/// at most 64 times regardless of `n`.
pub fn rpow<P: Precision>(mut x: FixedPoint<P>, mut n: u64) -> Result<FixedPoint<P>, ArithmeticError> {
    let mut result = FixedPoint::one();
    while n > 0 {
        if n & 1 == 1 {
            result = result.mul(x)?;
        }
        n >>= 1;
        if n > 0 {
            x = x.mul(x)?;
        }
    }
    Ok(result)
}
