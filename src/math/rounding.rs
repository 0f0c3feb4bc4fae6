use primitive_types::{U256, U512};
use thiserror::Error;

/// Failure inside the fixed-point layer. Never leaves the metrics calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("fixed-point overflow")]
    Overflow,
    #[error("fixed-point underflow")]
    Underflow,
}

/// Rounding applied when an exact quotient does not fit the target scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    /// Truncate toward zero. The ledger's own behaviour for every
    /// liquidation-critical value.
    #[default]
    Floor,
    /// Round half up.
    Nearest,
}

fn narrow(x: U512) -> Result<U256, ArithmeticError> {
    U256::try_from(x).map_err(|_| ArithmeticError::Overflow)
}

fn div_u512(n: U512, d: U512, rounding: Rounding) -> Result<U512, ArithmeticError> {
    if d.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    match rounding {
        Rounding::Floor => Ok(n / d),
        Rounding::Nearest => {
            let half = d / U512::from(2u64);
            Ok(n.checked_add(half).ok_or(ArithmeticError::Overflow)? / d)
        }
    }
}

/// `a * b / denom` with a 512-bit intermediate, so only the final result
/// can overflow.
pub fn mul_div(a: U256, b: U256, denom: U256, rounding: Rounding) -> Result<U256, ArithmeticError> {
    if denom.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    let n = a.full_mul(b);
    narrow(div_u512(n, U512::from(denom), rounding)?)
}

/// `prod(num) / prod(den)` with both products held at 512 bits, so a chained
/// formula is rounded exactly once.
pub fn div_products(num: &[U256], den: &[U256], rounding: Rounding) -> Result<U256, ArithmeticError> {
    narrow(div_u512(product(num)?, product(den)?, rounding)?)
}

fn product(factors: &[U256]) -> Result<U512, ArithmeticError> {
    factors.iter().try_fold(U512::one(), |acc, f| {
        acc.checked_mul(U512::from(*f)).ok_or(ArithmeticError::Overflow)
    })
}

/// `a / b` on raw integers.
pub fn div_rounded(a: U256, b: U256, rounding: Rounding) -> Result<U256, ArithmeticError> {
    mul_div(a, U256::one(), b, rounding)
}

/// `10^n`, the scale factor of a precision with `n` fractional digits.
pub fn pow10(n: u32) -> U256 {
    U256::exp10(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(x: u64) -> U256 {
        U256::from(x)
    }

    #[test]
    fn floor_truncates_and_nearest_rounds_half_up() {
        // 7 * 3 / 4 = 5.25
        assert_eq!(mul_div(u(7), u(3), u(4), Rounding::Floor).unwrap(), u(5));
        assert_eq!(mul_div(u(7), u(3), u(4), Rounding::Nearest).unwrap(), u(5));
        // 5 * 3 / 2 = 7.5
        assert_eq!(mul_div(u(5), u(3), u(2), Rounding::Floor).unwrap(), u(7));
        assert_eq!(mul_div(u(5), u(3), u(2), Rounding::Nearest).unwrap(), u(8));
        // 2 / 3 = 0.66..
        assert_eq!(div_rounded(u(2), u(3), Rounding::Floor).unwrap(), u(0));
        assert_eq!(div_rounded(u(2), u(3), Rounding::Nearest).unwrap(), u(1));
    }

    #[test]
    fn zero_denominator_is_reported() {
        assert_eq!(
            mul_div(u(1), u(1), U256::zero(), Rounding::Floor),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            div_rounded(u(1), U256::zero(), Rounding::Nearest),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn intermediate_product_may_exceed_256_bits() {
        // MAX * MAX / MAX fits once divided back down.
        assert_eq!(
            mul_div(U256::MAX, U256::MAX, U256::MAX, Rounding::Floor).unwrap(),
            U256::MAX
        );
        assert_eq!(
            mul_div(U256::MAX, u(2), u(1), Rounding::Floor),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn chained_division_rounds_once() {
        // 7 / (2 * 2) = 1.75
        assert_eq!(div_products(&[u(7)], &[u(2), u(2)], Rounding::Floor).unwrap(), u(1));
        assert_eq!(div_products(&[u(7)], &[u(2), u(2)], Rounding::Nearest).unwrap(), u(2));
        // common factors cancel without an intermediate truncation
        assert_eq!(div_products(&[u(10), u(3)], &[u(3), u(3)], Rounding::Floor).unwrap(), u(3));
        assert_eq!(
            div_products(&[u(1)], &[u(2), U256::zero()], Rounding::Floor),
            Err(ArithmeticError::DivisionByZero)
        );
        // three max-width factors do not fit in 512 bits
        assert_eq!(
            div_products(&[U256::MAX, U256::MAX, U256::MAX], &[], Rounding::Floor),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn pow10_matches_scales() {
        assert_eq!(pow10(0), u(1));
        assert_eq!(pow10(18), u(1_000_000_000_000_000_000));
        assert_eq!(pow10(27), pow10(18) * pow10(9));
    }
}
