use std::collections::HashSet;

use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::debt::DebtRecord;
use crate::decimal::{Money, Rate};
use crate::errors::{PayoffError, Result};
use crate::simulation::{SimulationResult, Simulator};
use crate::types::DebtId;

/// what-if adjustment applied to the inputs before re-running the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Scenario {
    /// every minimum and the extra payment scaled for the whole run
    JobLoss { income_factor: Decimal },
    /// one-time payment in a given month
    Windfall { amount: Money, month: u32 },
    /// apr replaced on the listed debts, or all debts when the list is empty
    RateChange { new_apr: Rate, affected: Vec<DebtId> },
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::JobLoss { .. } => "job_loss",
            Scenario::Windfall { .. } => "windfall",
            Scenario::RateChange { .. } => "rate_change",
        }
    }

    /// rewrite the inputs; the originals are left untouched
    pub fn apply(
        &self,
        records: &[DebtRecord],
        config: &SimulationConfig,
    ) -> Result<(Vec<DebtRecord>, SimulationConfig)> {
        let mut records = records.to_vec();
        let mut config = config.clone();

        match self {
            Scenario::JobLoss { income_factor } => {
                if *income_factor <= Decimal::ZERO || *income_factor > Decimal::ONE {
                    return Err(PayoffError::InvalidConfiguration {
                        message: format!("income factor must be in (0, 1]: {income_factor}"),
                    });
                }
                for record in &mut records {
                    record.min_payment = record.min_payment * *income_factor;
                }
                config.extra_payment = config.extra_payment * *income_factor;
            }
            Scenario::Windfall { amount, month } => {
                if !amount.is_positive() || *month == 0 {
                    return Err(PayoffError::InvalidConfiguration {
                        message: format!("windfall needs a positive amount and a month from 1: {amount} in month {month}"),
                    });
                }
                *config.lump_sums.entry(*month).or_insert(Money::ZERO) += *amount;
            }
            Scenario::RateChange { new_apr, affected } => {
                if new_apr.is_negative() {
                    return Err(PayoffError::InvalidConfiguration {
                        message: format!("new apr must not be negative: {new_apr}"),
                    });
                }

                let known: HashSet<DebtId> = records.iter().map(|r| r.id).collect();
                if let Some(unknown) = affected.iter().find(|id| !known.contains(id)) {
                    return Err(PayoffError::InvalidConfiguration {
                        message: format!("rate change names unknown debt id {unknown}"),
                    });
                }

                for record in &mut records {
                    if affected.is_empty() || affected.contains(&record.id) {
                        record.apr = *new_apr;
                    }
                }
            }
        }

        Ok((records, config))
    }
}

/// baseline against adjusted run; deltas are adjusted minus baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub baseline: SimulationResult,
    pub adjusted: SimulationResult,
    pub months_delta: i64,
    pub interest_delta: Money,
}

pub fn run_scenario(
    records: &[DebtRecord],
    config: &SimulationConfig,
    scenario: &Scenario,
    time_provider: &SafeTimeProvider,
) -> Result<ScenarioOutcome> {
    let (adjusted_records, adjusted_config) = scenario.apply(records, config)?;
    let start = time_provider.now();

    let (baseline, adjusted) = rayon::join(
        || Simulator::new(config.clone()).run_from(records, start),
        || Simulator::new(adjusted_config).run_from(&adjusted_records, start),
    );
    let (baseline, adjusted) = (baseline?, adjusted?);

    let months_delta = i64::from(adjusted.months_to_zero()) - i64::from(baseline.months_to_zero());
    let interest_delta = adjusted.total_interest_paid() - baseline.total_interest_paid();

    log::debug!(
        "scenario {}: {:+} months, interest delta {}",
        scenario.name(),
        months_delta,
        interest_delta
    );

    Ok(ScenarioOutcome {
        scenario: scenario.clone(),
        baseline,
        adjusted,
        months_delta,
        interest_delta,
    })
}
