pub mod compound;

use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{overflow, Result};
use crate::types::Compounding;

pub use compound::{DailyCompounding, MonthlyCompounding, NoInterest, DAYS_PER_MONTH, DAYS_PER_YEAR};

/// interest calculation result for one simulated month
#[derive(Debug, Clone, PartialEq)]
pub struct InterestCalculation {
    pub interest_amount: Money,
    pub periodic_rate: Decimal,
    pub principal_base: Money,
    pub calculation_method: &'static str,
}

/// rule turning an annual rate into one month of interest
///
/// Implementations must be pure: the same balance and rate always give the
/// same amount, so repeated runs stay byte-identical.
pub trait AccrualPolicy: Send + Sync {
    /// growth factor applied to the balance for one month (0.01 for 12% monthly)
    fn monthly_factor(&self, apr: Rate) -> Result<Decimal>;

    fn method(&self) -> &'static str;

    fn calculate_monthly(&self, principal: Money, apr: Rate) -> Result<InterestCalculation> {
        let factor = self.monthly_factor(apr)?;
        let interest_amount = principal
            .checked_interest_at(factor)
            .ok_or_else(|| overflow("monthly interest"))?;

        Ok(InterestCalculation {
            interest_amount,
            periodic_rate: factor,
            principal_base: principal,
            calculation_method: self.method(),
        })
    }
}

/// accrual policy for a compounding mode
pub fn policy_for(compounding: Compounding) -> &'static dyn AccrualPolicy {
    match compounding {
        Compounding::Monthly => &MonthlyCompounding,
        Compounding::Daily => &DailyCompounding,
        Compounding::None => &NoInterest,
    }
}

/// effective annual rate once twelve monthly factors compound
pub fn effective_annual_rate(apr: Rate, compounding: Compounding) -> Result<Rate> {
    let base = policy_for(compounding)
        .monthly_factor(apr)?
        .checked_add(Decimal::ONE)
        .ok_or_else(|| overflow("effective annual rate"))?;

    let mut compound_factor = Decimal::ONE;
    for _ in 0..12 {
        compound_factor = compound_factor
            .checked_mul(base)
            .ok_or_else(|| overflow("effective annual rate"))?;
    }
    Ok(Rate::from_decimal(compound_factor - Decimal::ONE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_effective_annual_rate() {
        let apr = Rate::from_percentage(18);

        let monthly = effective_annual_rate(apr, Compounding::Monthly).unwrap();
        assert!(monthly.as_percentage() > dec!(19.5));
        assert!(monthly.as_percentage() < dec!(19.6));

        // thirty-day months compound slightly less than a full 365-day year
        let daily = effective_annual_rate(apr, Compounding::Daily).unwrap();
        assert!(daily.as_percentage() > dec!(19.4));
        assert!(daily.as_percentage() < dec!(19.8));

        assert_eq!(effective_annual_rate(apr, Compounding::None).unwrap(), Rate::ZERO);
    }

    #[test]
    fn test_policy_dispatch() {
        let principal = Money::from_major(1_000);
        let apr = Rate::from_percentage(12);

        let calc = policy_for(Compounding::Monthly).calculate_monthly(principal, apr).unwrap();
        assert_eq!(calc.interest_amount, Money::from_major(10));
        assert_eq!(calc.calculation_method, "monthly");

        let calc = policy_for(Compounding::None).calculate_monthly(principal, apr).unwrap();
        assert_eq!(calc.interest_amount, Money::ZERO);
    }

    #[test]
    fn test_oversized_balance_is_an_error() {
        let calc = policy_for(Compounding::Monthly)
            .calculate_monthly(Money::from_decimal(Decimal::MAX), Rate::from_decimal(dec!(24)));
        assert!(matches!(calc, Err(crate::errors::PayoffError::CalculationError { .. })));
    }
}
