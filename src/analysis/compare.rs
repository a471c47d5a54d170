use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::debt::DebtRecord;
use crate::decimal::Money;
use crate::errors::{PayoffError, Result};
use crate::simulation::{SimulationResult, Simulator};
use crate::strategy::Strategy;
use crate::types::TerminalState;

/// one leg of a strategy comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyOutcome {
    pub strategy: Strategy,
    pub months_to_zero: u32,
    pub total_interest_paid: Money,
    pub total_payments_made: Money,
    pub debt_free_date: Option<NaiveDate>,
    pub terminal_state: TerminalState,
    /// this leg's interest minus the avalanche leg's
    pub interest_vs_avalanche: Money,
    pub months_vs_avalanche: i64,
}

/// avalanche, snowball and hybrid on identical inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyComparison {
    pub outcomes: Vec<StrategyOutcome>,
    pub lowest_interest: Strategy,
    pub fastest: Strategy,
}

impl StrategyComparison {
    pub fn outcome(&self, strategy: &Strategy) -> Option<&StrategyOutcome> {
        self.outcomes.iter().find(|o| &o.strategy == strategy)
    }
}

/// run every built-in strategy against the same debts and budget
///
/// Legs run in parallel; each owns its copy of the inputs. The config's own
/// strategy is ignored.
pub fn compare_strategies(
    records: &[DebtRecord],
    config: &SimulationConfig,
    time_provider: &SafeTimeProvider,
) -> Result<StrategyComparison> {
    let start = time_provider.now();

    let legs: Vec<SimulationResult> = Strategy::BUILT_IN
        .par_iter()
        .map(|strategy| Simulator::new(config.with_strategy(strategy.clone())).run_from(records, start))
        .collect::<Result<Vec<_>>>()?;

    let avalanche = legs
        .iter()
        .find(|leg| leg.summary.strategy_used == Strategy::Avalanche)
        .ok_or_else(|| PayoffError::CalculationError {
            message: "avalanche leg missing from comparison".to_string(),
        })?;

    let outcomes: Vec<StrategyOutcome> = legs
        .iter()
        .map(|leg| StrategyOutcome {
            strategy: leg.summary.strategy_used.clone(),
            months_to_zero: leg.months_to_zero(),
            total_interest_paid: leg.total_interest_paid(),
            total_payments_made: leg.summary.total_payments_made,
            debt_free_date: leg.summary.debt_free_date,
            terminal_state: leg.summary.terminal_state,
            interest_vs_avalanche: leg.total_interest_paid() - avalanche.total_interest_paid(),
            months_vs_avalanche: i64::from(leg.months_to_zero()) - i64::from(avalanche.months_to_zero()),
        })
        .collect();

    // debt-free legs beat horizon legs; earlier entries win ties
    let rank = |o: &StrategyOutcome| o.terminal_state != TerminalState::DebtFree;
    let lowest_interest = outcomes
        .iter()
        .min_by_key(|o| (rank(o), o.total_interest_paid, o.months_to_zero))
        .map(|o| o.strategy.clone())
        .unwrap_or_default();
    let fastest = outcomes
        .iter()
        .min_by_key(|o| (rank(o), o.months_to_zero, o.total_interest_paid))
        .map(|o| o.strategy.clone())
        .unwrap_or_default();

    log::info!(
        "compared {} strategies: lowest interest {}, fastest {}",
        outcomes.len(),
        lowest_interest,
        fastest
    );

    Ok(StrategyComparison {
        outcomes,
        lowest_interest,
        fastest,
    })
}

/// effect of paying more each month on top of the configured extra
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraPaymentImpact {
    pub base_extra: Money,
    pub additional_extra: Money,
    pub baseline_months: u32,
    pub new_months: u32,
    pub months_saved: i64,
    pub baseline_interest: Money,
    pub new_interest: Money,
    pub interest_saved: Money,
    pub new_debt_free_date: Option<NaiveDate>,
    /// interest saved per unit of additional monthly payment
    pub roi: Decimal,
}

pub fn extra_payment_impact(
    records: &[DebtRecord],
    config: &SimulationConfig,
    additional_extra: Money,
    time_provider: &SafeTimeProvider,
) -> Result<ExtraPaymentImpact> {
    if additional_extra.is_negative() {
        return Err(PayoffError::InvalidConfiguration {
            message: format!("additional extra payment must not be negative: {additional_extra}"),
        });
    }

    let start = time_provider.now();
    let boosted = config.with_extra_payment(config.extra_payment + additional_extra);

    let (baseline, improved) = rayon::join(
        || Simulator::new(config.clone()).run_from(records, start),
        || Simulator::new(boosted).run_from(records, start),
    );
    let (baseline, improved) = (baseline?, improved?);

    let interest_saved = baseline.total_interest_paid() - improved.total_interest_paid();
    let roi = if additional_extra.is_zero() {
        Decimal::ZERO
    } else {
        (interest_saved.as_decimal() / additional_extra.as_decimal()).round_dp(4)
    };

    Ok(ExtraPaymentImpact {
        base_extra: config.extra_payment,
        additional_extra,
        baseline_months: baseline.months_to_zero(),
        new_months: improved.months_to_zero(),
        months_saved: i64::from(baseline.months_to_zero()) - i64::from(improved.months_to_zero()),
        baseline_interest: baseline.total_interest_paid(),
        new_interest: improved.total_interest_paid(),
        interest_saved,
        new_debt_free_date: improved.summary.debt_free_date,
        roi,
    })
}
