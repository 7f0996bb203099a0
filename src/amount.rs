use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors raised when turning external input into an [`Amount`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("malformed amount '{0}'")]
    Malformed(String),

    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Fixed-point decimal with 2 decimal places, stored as a count of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 100;
    const DIGITS: u32 = 2;

    pub const ZERO: Amount = Amount(0);

    pub fn from_cents(cents: i64) -> Self {
        Amount(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    /// Round half-up (away from zero on the midpoint) to whole cents.
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let rounded =
            value.round_dp_with_strategy(Self::DIGITS, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::from(Self::SCALE))
            .and_then(|cents| cents.to_i64())
            .map(Amount)
            .ok_or(AmountError::OutOfRange(value))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value =
            Decimal::from_str(s.trim()).map_err(|_| AmountError::Malformed(s.to_string()))?;
        Amount::try_from(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / Self::SCALE as u64;
        let frac = abs % Self::SCALE as u64;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn from_cents_preserves_value() {
        assert_eq!(Amount::from_cents(250).cents(), 250);
    }

    #[test]
    fn from_decimal_converts_exactly() {
        assert_eq!(Amount::try_from(dec!(2.50)), Ok(Amount::from_cents(250)));
        assert_eq!(Amount::try_from(dec!(100)), Ok(Amount::from_cents(10_000)));
        assert_eq!(Amount::try_from(dec!(0.01)), Ok(Amount::from_cents(1)));
    }

    #[test]
    fn from_decimal_rounds_half_up() {
        assert_eq!(Amount::try_from(dec!(1.005)), Ok(Amount::from_cents(101)));
        assert_eq!(Amount::try_from(dec!(1.004)), Ok(Amount::from_cents(100)));
        assert_eq!(Amount::try_from(dec!(2.675)), Ok(Amount::from_cents(268)));
        assert_eq!(Amount::try_from(dec!(0.004)), Ok(Amount::ZERO));
    }

    #[test]
    fn from_decimal_rounds_negative_away_from_zero() {
        assert_eq!(Amount::try_from(dec!(-1.005)), Ok(Amount::from_cents(-101)));
    }

    #[test]
    fn from_decimal_out_of_range_fails() {
        let huge = Decimal::MAX;
        assert_eq!(Amount::try_from(huge), Err(AmountError::OutOfRange(huge)));
    }

    #[test]
    fn parse_decimal_string() {
        assert_eq!("3.00".parse::<Amount>(), Ok(Amount::from_cents(300)));
        assert_eq!(" 0.1 ".parse::<Amount>(), Ok(Amount::from_cents(10)));
        assert_eq!("-5".parse::<Amount>(), Ok(Amount::from_cents(-500)));
    }

    #[test]
    fn parse_malformed_string_fails() {
        assert!(matches!(
            "two dollars".parse::<Amount>(),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!("".parse::<Amount>(), Err(AmountError::Malformed(_))));
    }

    #[test]
    fn display_formats_positive() {
        assert_eq!(Amount::from_cents(250).to_string(), "2.50");
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::from_cents(0).to_string(), "0.00");
        assert_eq!(Amount::from_cents(123_400).to_string(), "1234.00");
    }

    #[test]
    fn display_formats_negative() {
        assert_eq!(Amount::from_cents(-502).to_string(), "-5.02");
        assert_eq!(Amount::from_cents(-1).to_string(), "-0.01");
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(Amount::default(), Amount::ZERO);
        assert!(!Amount::ZERO.is_positive());
    }

    #[test]
    fn arithmetic() {
        let mut a = Amount::from_cents(300);
        a += Amount::from_cents(50);
        assert_eq!(a, Amount::from_cents(350));
        a -= Amount::from_cents(100);
        assert_eq!(a, Amount::from_cents(250));
        assert_eq!(a - Amount::from_cents(300), Amount::from_cents(-50));
        assert_eq!(a + a, Amount::from_cents(500));
    }

    #[test]
    fn checked_add_detects_overflow() {
        let max = Amount::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Amount::from_cents(1)), None);
        assert_eq!(
            Amount::from_cents(1).checked_add(Amount::from_cents(2)),
            Some(Amount::from_cents(3))
        );
    }

    #[test]
    fn sum_of_amounts() {
        let total: Amount = [100, 200, 50].into_iter().map(Amount::from_cents).sum();
        assert_eq!(total, Amount::from_cents(350));
    }

    #[test]
    fn ordering() {
        assert!(Amount::from_cents(-1) < Amount::ZERO);
        assert!(Amount::ZERO < Amount::from_cents(1));
        assert_eq!(Amount::from_cents(300), "3".parse::<Amount>().unwrap());
    }
}
