use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// The number of micro-units in one whole unit of any supported currency.
pub const MONEY_SCALE: i64 = 1_000_000;
const MAX_FRACTION_DIGITS: u32 = 6;

//--------------------------------------       Money         ---------------------------------------------------------
/// A fixed-point monetary amount in micro-units (10⁻⁶ of a whole unit).
///
/// Amounts cross the wire as decimal strings ("1000", "2.5") and are stored in the ledger as
/// integer micro-units, so no floating point is involved anywhere in a balance mutation.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid monetary amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_whole(units: i64) -> Self {
        Self(units * MONEY_SCALE)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// Parses a non-negative decimal string ("1000", "1000.5") into micro-units.
/// At most six fractional digits are accepted; anything finer has no ledger representation.
impl FromStr for Money {
    type Err = MoneyConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.starts_with('-') || s.starts_with('+') {
            return Err(MoneyConversionError(s.to_string()));
        }
        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if fraction.len() > MAX_FRACTION_DIGITS as usize {
            return Err(MoneyConversionError(format!("{s} has more than {MAX_FRACTION_DIGITS} decimal places")));
        }
        let whole = whole.parse::<i64>().map_err(|e| MoneyConversionError(format!("{s}. {e}")))?;
        let fraction = if fraction.is_empty() {
            0
        } else {
            let digits = fraction.parse::<i64>().map_err(|e| MoneyConversionError(format!("{s}. {e}")))?;
            digits * 10i64.pow(MAX_FRACTION_DIGITS - fraction.len() as u32)
        };
        whole
            .checked_mul(MONEY_SCALE)
            .and_then(|w| w.checked_add(fraction))
            .map(Self)
            .ok_or_else(|| MoneyConversionError(format!("{s} is too large")))
    }
}

/// Renders the canonical decimal-string form, with trailing fractional zeroes trimmed.
impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / MONEY_SCALE as u64;
        let fraction = magnitude % MONEY_SCALE as u64;
        if fraction == 0 {
            write!(f, "{sign}{whole}")
        } else {
            let digits = format!("{fraction:06}");
            write!(f, "{sign}{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_whole_amounts() {
        assert_eq!("1000".parse::<Money>().unwrap(), Money::from(1_000_000_000));
        assert_eq!("0".parse::<Money>().unwrap(), Money::zero());
    }

    #[test]
    fn parses_fractional_amounts() {
        assert_eq!("2.5".parse::<Money>().unwrap(), Money::from(2_500_000));
        assert_eq!("0.000001".parse::<Money>().unwrap(), Money::from(1));
        assert_eq!("1700.25".parse::<Money>().unwrap(), Money::from(1_700_250_000));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!("".parse::<Money>().is_err());
        assert!("-5".parse::<Money>().is_err());
        assert!("1.2345678".parse::<Money>().is_err());
        assert!("ten".parse::<Money>().is_err());
        assert!("10_000".parse::<Money>().is_err());
    }

    #[test]
    fn renders_canonical_decimal_strings() {
        assert_eq!(Money::from_whole(1000).to_string(), "1000");
        assert_eq!(Money::from(2_500_000).to_string(), "2.5");
        assert_eq!(Money::from(1).to_string(), "0.000001");
        assert_eq!((-Money::from(2_500_000)).to_string(), "-2.5");
    }

    #[test]
    fn arithmetic_forwards_to_the_inner_value() {
        let a = Money::from_whole(10);
        let b = Money::from_whole(4);
        assert_eq!(a - b, Money::from_whole(6));
        assert_eq!(a + b, Money::from_whole(14));
        assert_eq!(a * 3, Money::from_whole(30));
        assert_eq!(-a, Money::from(-10_000_000));
        let mut c = a;
        c -= b;
        assert_eq!(c, Money::from_whole(6));
        let total: Money = [a, b, c].into_iter().sum();
        assert_eq!(total, Money::from_whole(20));
    }
}
