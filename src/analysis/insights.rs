use rust_decimal_macros::dec;
use serde::Serialize;

use crate::config::DEFAULT_MAX_MONTHS;
use crate::debt::{Debt, DebtRecord};
use crate::decimal::{Money, Rate};
use crate::errors::{overflow, PayoffError, Result};
use crate::strategy::{Strategy, StrategySelector};
use crate::types::DebtId;

/// the debt a strategy would attack first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub debt_id: DebtId,
    pub name: String,
    pub balance: Money,
    pub apr: Rate,
    pub monthly_interest: Money,
    /// months to clear on the minimum alone; none when it never does
    pub months_on_minimum: Option<u32>,
}

/// value of one month's extra payment sent to the avalanche target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginalBenefit {
    pub extra: Money,
    pub target: Option<DebtId>,
    pub target_name: Option<String>,
    pub target_apr: Option<Rate>,
    pub monthly_benefit: Money,
    pub annual_benefit: Money,
}

fn working_debts(records: &[DebtRecord]) -> Result<Vec<Debt>> {
    for record in records {
        record.validate()?;
    }

    let debts: Vec<Debt> = records.iter().map(Debt::from_record).collect();
    if !debts.iter().any(Debt::is_active) {
        return Err(PayoffError::NoActiveDebts);
    }
    Ok(debts)
}

/// top-priority debt for a strategy
pub fn recommend(records: &[DebtRecord], strategy: &Strategy) -> Result<Recommendation> {
    let debts = working_debts(records)?;
    let selector = StrategySelector::new(strategy, &debts)?;
    let target = selector.top(&debts).ok_or(PayoffError::NoActiveDebts)?;

    Ok(Recommendation {
        strategy: strategy.clone(),
        debt_id: target.id,
        name: target.name.clone(),
        balance: target.principal,
        apr: target.apr,
        monthly_interest: target.monthly_interest()?,
        months_on_minimum: months_on_minimum(target)?,
    })
}

/// one recommendation per built-in strategy
pub fn top_targets(records: &[DebtRecord]) -> Result<Vec<Recommendation>> {
    Strategy::BUILT_IN
        .iter()
        .map(|strategy| recommend(records, strategy))
        .collect()
}

pub fn marginal_benefit(records: &[DebtRecord], extra: Money) -> Result<MarginalBenefit> {
    let debts = working_debts(records)?;

    if !extra.is_positive() {
        return Ok(MarginalBenefit {
            extra,
            target: None,
            target_name: None,
            target_apr: None,
            monthly_benefit: Money::ZERO,
            annual_benefit: Money::ZERO,
        });
    }

    let selector = StrategySelector::new(&Strategy::Avalanche, &debts)?;
    let target = selector.top(&debts).ok_or(PayoffError::NoActiveDebts)?;

    Ok(MarginalBenefit {
        extra,
        target: Some(target.id),
        target_name: Some(target.name.clone()),
        target_apr: Some(target.apr),
        monthly_benefit: extra
            .checked_interest_at(target.apr.as_decimal() / dec!(12))
            .ok_or_else(|| overflow("monthly benefit"))?,
        annual_benefit: extra
            .checked_interest_at(target.apr.as_decimal())
            .ok_or_else(|| overflow("annual benefit"))?,
    })
}

/// iterate the debt's own accrual on its minimum payment
fn months_on_minimum(debt: &Debt) -> Result<Option<u32>> {
    if debt.is_underfunded()? {
        return Ok(None);
    }

    let mut debt = debt.clone();
    let mut months = 0;
    while debt.is_active() && months < DEFAULT_MAX_MONTHS {
        debt.accrue_interest()?;
        debt.apply_payment(debt.min_payment);
        months += 1;
    }

    if debt.is_active() {
        Ok(None)
    } else {
        Ok(Some(months))
    }
}
