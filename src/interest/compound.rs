use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::decimal::Rate;
use crate::errors::{overflow, Result};
use crate::interest::AccrualPolicy;

/// fixed month length used for daily compounding and projected dates
pub const DAYS_PER_MONTH: u32 = 30;

pub const DAYS_PER_YEAR: u32 = 365;

/// apr / 12 each month
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyCompounding;

impl AccrualPolicy for MonthlyCompounding {
    fn monthly_factor(&self, apr: Rate) -> Result<Decimal> {
        Ok(apr.as_decimal() / dec!(12))
    }

    fn method(&self) -> &'static str {
        "monthly"
    }
}

/// daily compounding over a 30-day month: (1 + apr/365)^30 - 1
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyCompounding;

impl AccrualPolicy for DailyCompounding {
    fn monthly_factor(&self, apr: Rate) -> Result<Decimal> {
        let daily_rate = apr.as_decimal() / Decimal::from(DAYS_PER_YEAR);

        // calculate (1 + r)^n using iteration
        let mut compound_factor = Decimal::ONE;
        let base = Decimal::ONE + daily_rate;
        for _ in 0..DAYS_PER_MONTH {
            compound_factor = compound_factor
                .checked_mul(base)
                .ok_or_else(|| overflow("daily compound factor"))?;
        }
        Ok(compound_factor - Decimal::ONE)
    }

    fn method(&self) -> &'static str {
        "daily"
    }
}

/// interest-free debt
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterest;

impl AccrualPolicy for NoInterest {
    fn monthly_factor(&self, _apr: Rate) -> Result<Decimal> {
        Ok(Decimal::ZERO)
    }

    fn method(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;

    #[test]
    fn test_monthly_compounding() {
        let interest = MonthlyCompounding
            .calculate_monthly(Money::from_major(1_000), Rate::from_percentage(12))
            .unwrap()
            .interest_amount;

        assert_eq!(interest, Money::from_str_exact("10.00").unwrap());
    }

    #[test]
    fn test_daily_compounding() {
        let principal = Money::from_major(10_000);
        let rate = Rate::from_percentage(18);

        let interest = DailyCompounding.calculate_monthly(principal, rate).unwrap().interest_amount;

        // 30 days at 18% compounds to a little over simple interest of 147.95
        assert!(interest > Money::from_major(148));
        assert!(interest < Money::from_major(150));
    }

    #[test]
    fn test_daily_stays_below_monthly() {
        let principal = Money::from_major(10_000);
        let rate = Rate::from_percentage(24);

        let monthly = MonthlyCompounding.calculate_monthly(principal, rate).unwrap().interest_amount;
        let daily = DailyCompounding.calculate_monthly(principal, rate).unwrap().interest_amount;

        // 30 compounded days at apr/365 stays just under apr/12
        assert!(daily < monthly);
        assert!((monthly - daily).abs() < Money::from_major(2));
    }

    #[test]
    fn test_no_interest() {
        let interest = NoInterest
            .calculate_monthly(Money::from_major(5_000), Rate::from_percentage(20))
            .unwrap()
            .interest_amount;
        assert!(interest.is_zero());
    }

    #[test]
    fn test_daily_factor_overflow_is_an_error() {
        let err = DailyCompounding
            .monthly_factor(Rate::from_decimal(Decimal::from(1_000_000)))
            .unwrap_err();
        assert!(matches!(err, crate::errors::PayoffError::CalculationError { .. }));
    }
}
