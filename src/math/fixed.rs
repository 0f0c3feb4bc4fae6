//! Precision-tagged fixed-point decimals.
//!
//! A `FixedPoint<Wad>` and a `FixedPoint<Ray>` are different types, so two
//! values can only be combined after one of them has been explicitly
//! rescaled. Raw storage is an unsigned 256-bit integer; all products go
//! through a 512-bit intermediate.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::math::rounding::{ArithmeticError, Rounding, div_rounded, mul_div, pow10};

/// Number of fractional decimal digits carried by a fixed-point value.
pub trait Precision: Copy + fmt::Debug + Send + Sync + 'static {
    const DECIMALS: u32;
    const NAME: &'static str;
}

/// 18 fractional digits. Token amounts, debt, percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Wad;

/// 27 fractional digits. Prices, ratios and per-second rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ray;

impl Precision for Wad {
    const DECIMALS: u32 = 18;
    const NAME: &'static str = "wad";
}

impl Precision for Ray {
    const DECIMALS: u32 = 27;
    const NAME: &'static str = "ray";
}

pub struct FixedPoint<P: Precision> {
    raw: U256,
    _precision: PhantomData<P>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFixedPointError {
    #[error("empty decimal string")]
    Empty,
    #[error("invalid character in decimal string `{0}`")]
    InvalidDigit(String),
    #[error("more than {max} fractional digits in `{input}`")]
    TooManyDecimals { input: String, max: u32 },
    #[error("decimal value `{0}` does not fit in 256 bits")]
    Overflow(String),
}

impl<P: Precision> FixedPoint<P> {
    pub fn from_raw(raw: U256) -> Self {
        Self {
            raw,
            _precision: PhantomData,
        }
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn scale() -> U256 {
        pow10(P::DECIMALS)
    }

    pub fn zero() -> Self {
        Self::from_raw(U256::zero())
    }

    pub fn one() -> Self {
        Self::from_raw(Self::scale())
    }

    /// Whole number of units, e.g. `from_integer(300)` is 300.0.
    pub fn from_integer(units: u64) -> Self {
        Self::from_raw(U256::from(units) * Self::scale())
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, ArithmeticError> {
        self.raw
            .checked_add(rhs.raw)
            .map(Self::from_raw)
            .ok_or(ArithmeticError::Overflow)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, ArithmeticError> {
        self.raw
            .checked_sub(rhs.raw)
            .map(Self::from_raw)
            .ok_or(ArithmeticError::Underflow)
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self::from_raw(self.raw.saturating_sub(rhs.raw))
    }

    /// `floor(a * b / 10^p)`
    pub fn mul(self, rhs: Self) -> Result<Self, ArithmeticError> {
        self.mul_rounded(rhs, Rounding::Floor)
    }

    /// `floor(a * 10^p / b)`; fails on a zero divisor.
    pub fn div(self, rhs: Self) -> Result<Self, ArithmeticError> {
        self.div_rounded(rhs, Rounding::Floor)
    }

    pub fn mul_rounded(self, rhs: Self, rounding: Rounding) -> Result<Self, ArithmeticError> {
        mul_div(self.raw, rhs.raw, Self::scale(), rounding).map(Self::from_raw)
    }

    pub fn div_rounded(self, rhs: Self, rounding: Rounding) -> Result<Self, ArithmeticError> {
        mul_div(self.raw, Self::scale(), rhs.raw, rounding).map(Self::from_raw)
    }

    /// Multiply by an integer count, exact.
    pub fn mul_int(self, n: u64) -> Result<Self, ArithmeticError> {
        self.raw
            .checked_mul(U256::from(n))
            .map(Self::from_raw)
            .ok_or(ArithmeticError::Overflow)
    }

    /// Move to another precision, truncating digits that no longer fit.
    pub fn rescale<Q: Precision>(self) -> Result<FixedPoint<Q>, ArithmeticError> {
        self.rescale_rounded(Rounding::Floor)
    }

    pub fn rescale_rounded<Q: Precision>(
        self,
        rounding: Rounding,
    ) -> Result<FixedPoint<Q>, ArithmeticError> {
        let raw = match Q::DECIMALS.cmp(&P::DECIMALS) {
            Ordering::Equal => self.raw,
            Ordering::Greater => self
                .raw
                .checked_mul(pow10(Q::DECIMALS - P::DECIMALS))
                .ok_or(ArithmeticError::Overflow)?,
            Ordering::Less => div_rounded(self.raw, pow10(P::DECIMALS - Q::DECIMALS), rounding)?,
        };
        Ok(FixedPoint::from_raw(raw))
    }

    /// Drop the fractional part (`Floor`) or round it to the closest
    /// whole unit (`Nearest`).
    pub fn round_to_integer(self, rounding: Rounding) -> Result<Self, ArithmeticError> {
        let whole = div_rounded(self.raw, Self::scale(), rounding)?;
        whole
            .checked_mul(Self::scale())
            .map(Self::from_raw)
            .ok_or(ArithmeticError::Overflow)
    }
}

impl<P: Precision> Clone for FixedPoint<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Precision> Copy for FixedPoint<P> {}

impl<P: Precision> PartialEq for FixedPoint<P> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<P: Precision> Eq for FixedPoint<P> {}

impl<P: Precision> PartialOrd for FixedPoint<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Precision> Ord for FixedPoint<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<P: Precision> Hash for FixedPoint<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<P: Precision> Default for FixedPoint<P> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<P: Precision> fmt::Display for FixedPoint<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = Self::scale();
        let int = self.raw / scale;
        let frac = self.raw % scale;
        if frac.is_zero() {
            return write!(f, "{int}");
        }
        let digits = format!("{:0>width$}", frac.to_string(), width = P::DECIMALS as usize);
        write!(f, "{int}.{}", digits.trim_end_matches('0'))
    }
}

impl<P: Precision> fmt::Debug for FixedPoint<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", P::NAME, self)
    }
}

impl<P: Precision> FromStr for FixedPoint<P> {
    type Err = ParseFixedPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseFixedPointError::Empty);
        }
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(ParseFixedPointError::Empty);
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(ParseFixedPointError::InvalidDigit(s.to_string()));
        }
        if frac.len() > P::DECIMALS as usize {
            return Err(ParseFixedPointError::TooManyDecimals {
                input: s.to_string(),
                max: P::DECIMALS,
            });
        }

        let overflow = || ParseFixedPointError::Overflow(s.to_string());
        let int = if int.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(int).map_err(|_| overflow())?
        };
        let frac = if frac.is_empty() {
            U256::zero()
        } else {
            let padded = format!("{frac:0<width$}", width = P::DECIMALS as usize);
            U256::from_dec_str(&padded).map_err(|_| overflow())?
        };

        int.checked_mul(Self::scale())
            .and_then(|v| v.checked_add(frac))
            .map(Self::from_raw)
            .ok_or_else(overflow)
    }
}

impl<P: Precision> Serialize for FixedPoint<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, P: Precision> Deserialize<'de> for FixedPoint<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
