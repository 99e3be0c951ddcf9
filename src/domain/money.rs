use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Represents a monetary value with exact decimal precision.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific rules
/// and provide type safety for financial calculations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Money(pub Decimal);

/// A duration of work, in decimal hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Hours(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Converts a processor amount expressed in currency minor units (cents).
    pub fn from_minor_units(units: i64) -> Self {
        Self(Decimal::new(units, 2))
    }

    /// The given percentage (0-100) of this amount.
    pub fn percent(self, percentage: Decimal) -> Self {
        Self(self.0 * percentage / Decimal::ONE_HUNDRED)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Hours {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(hours: Decimal) -> Self {
        Self(hours)
    }

    /// Subtraction clamped at zero; hours never go negative.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }

    /// Pay for these hours at the given hourly rate.
    pub fn at_rate(self, rate: Decimal) -> Money {
        Money(self.0 * rate)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Add for Hours {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(10.0));
        let b = Money::new(dec!(5.0));
        assert_eq!(a + b, Money::new(dec!(15.0)));
        assert_eq!(a - b, Money::new(dec!(5.0)));
    }

    #[test]
    fn test_money_percent() {
        let total = Money::new(dec!(100));
        assert_eq!(total.percent(dec!(20)), Money::new(dec!(20)));
        assert_eq!(total.percent(dec!(0)), Money::ZERO);
    }

    #[test]
    fn test_money_from_minor_units() {
        assert_eq!(Money::from_minor_units(12050), Money::new(dec!(120.50)));
    }

    #[test]
    fn test_hours_saturating_sub() {
        let total = Hours::new(dec!(3));
        assert_eq!(total.saturating_sub(Hours::new(dec!(2))), Hours::new(dec!(1)));
        assert_eq!(total.saturating_sub(Hours::new(dec!(5))), Hours::ZERO);
    }

    #[test]
    fn test_hours_at_rate() {
        assert_eq!(Hours::new(dec!(4)).at_rate(dec!(15)), Money::new(dec!(60)));
    }
}
