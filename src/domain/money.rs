use crate::error::{MarketError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A rupee amount with paise precision.
///
/// This is a wrapper around `rust_decimal::Decimal` so monetary values never
/// mix with bare numbers. Reports serialize it as the plain decimal value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// A price as charged to a requester. Prices must be strictly positive.
    pub fn price(amount: Decimal) -> Result<Self> {
        if amount > Decimal::ZERO {
            Ok(Self(amount))
        } else {
            Err(MarketError::Validation(
                "price must be positive".to_string(),
            ))
        }
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

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform commission rate, stored as a fraction of the price.
///
/// The platform advertises "1-3% per completed service"; any rate outside
/// that band is rejected at construction, so a `CommissionRate` in hand is
/// always chargeable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    /// Builds a rate from a percentage, e.g. `2` or `2.5`. Must lie in [1, 3].
    pub fn from_percent(percent: Decimal) -> Result<Self> {
        if percent >= Decimal::ONE && percent <= Decimal::from(3) {
            Ok(Self(percent / Decimal::ONE_HUNDRED))
        } else {
            Err(MarketError::Validation(
                "commission rate must be between 1% and 3%".to_string(),
            ))
        }
    }

    pub fn fraction(&self) -> Decimal {
        self.0
    }

    pub fn as_percent(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }
}

impl Default for CommissionRate {
    /// The standard platform rate of 2%.
    fn default() -> Self {
        Self(Decimal::new(2, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(10.50));
        let b = Money::new(dec!(4.50));
        assert_eq!(a + b, Money::new(dec!(15.0)));

        let mut total = Money::ZERO;
        total += a;
        total += b;
        assert_eq!(total, Money::new(dec!(15)));
    }

    #[test]
    fn test_price_validation() {
        assert!(Money::price(dec!(500)).is_ok());
        assert!(matches!(
            Money::price(dec!(0)),
            Err(MarketError::Validation(_))
        ));
        assert!(matches!(
            Money::price(dec!(-1)),
            Err(MarketError::Validation(_))
        ));
    }

    #[test]
    fn test_commission_rate_bounds() {
        assert!(CommissionRate::from_percent(dec!(1)).is_ok());
        assert!(CommissionRate::from_percent(dec!(2.5)).is_ok());
        assert!(CommissionRate::from_percent(dec!(3)).is_ok());
        assert!(matches!(
            CommissionRate::from_percent(dec!(0.5)),
            Err(MarketError::Validation(_))
        ));
        assert!(matches!(
            CommissionRate::from_percent(dec!(3.01)),
            Err(MarketError::Validation(_))
        ));
    }

    #[test]
    fn test_commission_rate_fraction() {
        let rate = CommissionRate::from_percent(dec!(2)).unwrap();
        assert_eq!(rate.fraction(), dec!(0.02));
        assert_eq!(rate.as_percent(), dec!(2));
        assert_eq!(CommissionRate::default(), rate);
    }
}
