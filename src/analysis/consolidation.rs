use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::debt::DebtRecord;
use crate::decimal::{Money, Rate};
use crate::errors::{PayoffError, Result};
use crate::simulation::Simulator;

/// terms of a single loan replacing every debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationOffer {
    pub apr: Rate,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidationAnalysis {
    pub offer: ConsolidationOffer,
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    /// figures of the current plan under the given config
    pub current_monthly_budget: Money,
    pub current_months: u32,
    pub current_interest: Money,
    /// current interest minus consolidated interest
    pub interest_saved: Money,
    /// current months minus the loan term
    pub months_saved: i64,
}

impl ConsolidationAnalysis {
    pub fn is_beneficial(&self) -> bool {
        self.interest_saved.is_positive()
    }
}

pub fn analyze_consolidation(
    records: &[DebtRecord],
    config: &SimulationConfig,
    offer: ConsolidationOffer,
    time_provider: &SafeTimeProvider,
) -> Result<ConsolidationAnalysis> {
    if offer.term_months == 0 {
        return Err(PayoffError::InvalidConfiguration {
            message: "consolidation term must be at least one month".to_string(),
        });
    }
    if offer.apr.is_negative() {
        return Err(PayoffError::InvalidConfiguration {
            message: format!("consolidation apr must not be negative: {}", offer.apr),
        });
    }

    let current = Simulator::new(config.clone()).run(records, time_provider)?;

    let loan_amount: Money = records.iter().map(|r| r.principal).sum();
    let monthly_payment = annuity_payment(loan_amount, offer.apr, offer.term_months)?;
    let total_paid = monthly_payment * Decimal::from(offer.term_months);
    let total_interest = total_paid - loan_amount;

    Ok(ConsolidationAnalysis {
        offer,
        loan_amount,
        monthly_payment,
        total_interest,
        total_paid,
        current_monthly_budget: records.iter().map(|r| r.min_payment).sum::<Money>() + config.extra_payment,
        current_months: current.months_to_zero(),
        current_interest: current.total_interest_paid(),
        interest_saved: current.total_interest_paid() - total_interest,
        months_saved: i64::from(current.months_to_zero()) - i64::from(offer.term_months),
    })
}

/// level payment clearing `principal` over `months` at `apr`
fn annuity_payment(principal: Money, apr: Rate, months: u32) -> Result<Money> {
    let monthly_rate = apr.as_decimal() / dec!(12);

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    // P * r * (1 + r)^n / ((1 + r)^n - 1)
    let base = Decimal::ONE + monthly_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound = compound
            .checked_mul(base)
            .ok_or_else(|| PayoffError::CalculationError {
                message: format!("compound factor overflow over {months} months"),
            })?;
    }

    let numerator = principal.as_decimal() * monthly_rate * compound;
    let denominator = compound - Decimal::ONE;

    Ok(Money::from_decimal(numerator / denominator))
}
