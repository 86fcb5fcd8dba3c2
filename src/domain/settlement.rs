use crate::domain::catalog::ServiceTypeId;
use crate::domain::money::{CommissionRate, Money};
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The split of a completed request's price between the platform and the
/// vendor. Recorded on the request exactly once, at completion time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub commission: Money,
    pub vendor_payment: Money,
}

/// Splits `price` into platform commission and vendor payout.
///
/// Pure and deterministic. The commission is the price times the rate,
/// rounded UP to the paisa, and the vendor payout is the exact difference,
/// so `commission + vendor_payment` always reconstructs the price and any
/// sub-paisa remainder lands with the platform.
pub fn settle(price: Money, rate: CommissionRate) -> Settlement {
    let commission = (price.value() * rate.fraction())
        .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity)
        .normalize();
    let vendor_payment = (price.value() - commission).normalize();
    Settlement {
        commission: Money::new(commission),
        vendor_payment: Money::new(vendor_payment),
    }
}

/// Commission rates by service type: a default plus optional per-service
/// overrides. Every rate is already validated into the 1-3% band, so rate
/// resolution cannot fail.
#[derive(Debug, Clone, Default)]
pub struct CommissionSchedule {
    default_rate: CommissionRate,
    overrides: HashMap<ServiceTypeId, CommissionRate>,
}

impl CommissionSchedule {
    pub fn new(default_rate: CommissionRate) -> Self {
        Self {
            default_rate,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, service_type: ServiceTypeId, rate: CommissionRate) -> Self {
        self.overrides.insert(service_type, rate);
        self
    }

    pub fn rate_for(&self, service_type: ServiceTypeId) -> CommissionRate {
        self.overrides
            .get(&service_type)
            .copied()
            .unwrap_or(self.default_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate(percent: rust_decimal::Decimal) -> CommissionRate {
        CommissionRate::from_percent(percent).unwrap()
    }

    #[test]
    fn test_settle_even_split() {
        let split = settle(Money::new(dec!(800)), rate(dec!(2)));
        assert_eq!(split.commission, Money::new(dec!(16)));
        assert_eq!(split.vendor_payment, Money::new(dec!(784)));
    }

    #[test]
    fn test_settle_remainder_goes_to_commission() {
        // 99.99 * 2% = 1.9998 -> commission rounds up to 2.00
        let split = settle(Money::new(dec!(99.99)), rate(dec!(2)));
        assert_eq!(split.commission, Money::new(dec!(2)));
        assert_eq!(split.vendor_payment, Money::new(dec!(97.99)));

        // 333.33 * 1% = 3.3333 -> 3.34
        let split = settle(Money::new(dec!(333.33)), rate(dec!(1)));
        assert_eq!(split.commission, Money::new(dec!(3.34)));
        assert_eq!(split.vendor_payment, Money::new(dec!(329.99)));
    }

    #[test]
    fn test_settle_reconstructs_price() {
        let prices = [
            dec!(0.01),
            dec!(0.5),
            dec!(1),
            dec!(99.99),
            dec!(123.45),
            dec!(500),
            dec!(800),
            dec!(1000),
            dec!(12345.67),
        ];
        let percents = [dec!(1), dec!(1.5), dec!(2), dec!(2.5), dec!(3)];

        for price in prices {
            for percent in percents {
                let split = settle(Money::new(price), rate(percent));
                assert_eq!(
                    split.commission + split.vendor_payment,
                    Money::new(price),
                    "split of {price} at {percent}% must reconstruct the price"
                );
                assert!(split.commission.value() >= dec!(0));
                assert!(split.vendor_payment.value() >= dec!(0));
            }
        }
    }

    #[test]
    fn test_schedule_resolution() {
        let schedule = CommissionSchedule::new(rate(dec!(2))).with_override(5, rate(dec!(3)));
        assert_eq!(schedule.rate_for(1), rate(dec!(2)));
        assert_eq!(schedule.rate_for(5), rate(dec!(3)));

        let default_schedule = CommissionSchedule::default();
        assert_eq!(default_schedule.rate_for(1), CommissionRate::default());
    }
}
