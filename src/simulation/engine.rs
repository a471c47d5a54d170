use std::collections::HashSet;

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;

use crate::config::SimulationConfig;
use crate::debt::{Debt, DebtRecord};
use crate::decimal::Money;
use crate::errors::{overflow, PayoffError, Result};
use crate::events::{Event, EventStore};
use crate::simulation::aggregator::{ResultAggregator, SimulationResult};
use crate::simulation::snapshot::{projected_date, DebtMonthState, MonthSnapshot};
use crate::strategy::StrategySelector;
use crate::types::{DebtId, TerminalState};

/// month-by-month repayment simulator
///
/// Stateless between runs: every call to `run` copies the records into
/// private working debts, so concurrent runs never share mutable state.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// run the projection starting at the provider's current instant
    pub fn run(&self, records: &[DebtRecord], time_provider: &SafeTimeProvider) -> Result<SimulationResult> {
        self.run_from(records, time_provider.now())
    }

    /// run the projection from an explicit start instant
    pub fn run_from(&self, records: &[DebtRecord], start: DateTime<Utc>) -> Result<SimulationResult> {
        self.config.validate()?;
        validate_records(records)?;

        let mut debts: Vec<Debt> = records.iter().map(Debt::from_record).collect();
        if !debts.iter().any(Debt::is_active) {
            return Err(PayoffError::NoActiveDebts);
        }

        let selector = StrategySelector::new(&self.config.strategy, &debts)?;

        // every month of the horizon needs a date
        projected_date(start, self.config.max_months, self.config.month_spacing_days)?;

        // fixed for the whole run: freed minimums stay in the budget
        let total_required = records
            .iter()
            .try_fold(self.config.extra_payment, |total, r| total.checked_add(r.min_payment))
            .ok_or_else(|| overflow("monthly budget"))?;

        let mut run = RunState {
            start,
            total_required,
            events: EventStore::new(),
            shortfall_reported: HashSet::new(),
        };

        run.events.emit(Event::SimulationStarted {
            strategy: self.config.strategy.name().to_string(),
            debt_count: debts.iter().filter(|d| d.is_active()).count(),
            monthly_budget: total_required,
            start_date: start.date_naive(),
        });
        log::info!(
            "simulating {} debts with {} strategy, monthly budget {}",
            debts.len(),
            self.config.strategy,
            total_required
        );

        let mut aggregator = ResultAggregator::new(self.config.strategy.clone());
        let mut terminal_state = TerminalState::HorizonExceeded;

        for month in 1..=self.config.max_months {
            let Some(interest) = accrue_month(&mut debts, aggregator.total_interest()) else {
                log::warn!("balances leave the decimal range in month {month}, stopping early");
                break;
            };
            let snapshot = self.step(month, &mut debts, interest, &selector, &mut run)?;
            aggregator.record(snapshot)?;

            if !debts.iter().any(Debt::is_active) {
                terminal_state = TerminalState::DebtFree;
                break;
            }
        }

        if terminal_state == TerminalState::HorizonExceeded {
            let remaining_balance: Money = debts.iter().map(|d| d.principal).sum();
            log::warn!(
                "horizon of {} months exceeded with {} outstanding",
                self.config.max_months,
                remaining_balance
            );
            run.events.emit(Event::HorizonExceeded {
                max_months: self.config.max_months,
                remaining_balance,
            });
        }

        run.events.emit(Event::SimulationCompleted {
            months: aggregator.months_recorded(),
            total_interest: aggregator.total_interest(),
            total_payments: aggregator.total_payments(),
        });

        Ok(aggregator.finish(
            &debts,
            terminal_state,
            self.config.max_months,
            run.events.take_events(),
        ))
    }

    /// one month after accrual: pay minimums, hand the leftover budget down the priority list
    fn step(
        &self,
        month: u32,
        debts: &mut [Debt],
        interest: Vec<Money>,
        selector: &StrategySelector,
        run: &mut RunState,
    ) -> Result<MonthSnapshot> {
        let date = projected_date(run.start, month, self.config.month_spacing_days)?;
        let mut payments = vec![Money::ZERO; debts.len()];
        let mut paid_off = Vec::new();

        for (i, debt) in debts.iter().enumerate() {
            if debt.is_active()
                && debt.min_payment <= interest[i]
                && run.shortfall_reported.insert(debt.id)
            {
                log::warn!(
                    "minimum payment {} on debt {} does not cover interest {}",
                    debt.min_payment,
                    debt.id,
                    interest[i]
                );
                run.events.emit(Event::MinimumShortfall {
                    debt_id: debt.id,
                    month,
                    min_payment: debt.min_payment,
                    interest: interest[i],
                });
            }
        }

        for (i, debt) in debts.iter_mut().enumerate() {
            if !debt.is_active() {
                continue;
            }
            let application = debt.apply_payment(debt.min_payment);
            payments[i] += application.total_applied();
            if !debt.is_active() {
                paid_off.push(i);
            }
        }

        let lump_sum = self.config.lump_sum(month);
        if lump_sum.is_positive() {
            run.events.emit(Event::LumpSumApplied {
                month,
                amount: lump_sum,
            });
        }

        let minimums_paid: Money = payments.iter().sum();
        let mut leftover = run
            .total_required
            .checked_add(lump_sum)
            .ok_or_else(|| overflow("monthly budget"))?
            - minimums_paid;

        // cascade: whatever a cleared debt did not need moves to the next target
        while leftover.is_positive() {
            let Some(target) = selector.top_index(debts) else {
                break;
            };
            let application = debts[target].apply_payment(leftover);
            payments[target] += application.total_applied();
            leftover = application.excess;

            if debts[target].is_active() {
                break;
            }
            paid_off.push(target);
        }

        if leftover.is_positive() {
            run.events.emit(Event::BudgetUnspent {
                month,
                amount: leftover,
            });
        }

        let mut paid_off_names = Vec::with_capacity(paid_off.len());
        for index in paid_off {
            let debt = &debts[index];
            log::debug!("debt {} ({}) paid off in month {}", debt.id, debt.name, month);
            run.events.emit(Event::DebtPaidOff {
                debt_id: debt.id,
                name: debt.name.clone(),
                month,
                date,
            });
            paid_off_names.push(debt.name.clone());
        }

        let states: Vec<DebtMonthState> = debts
            .iter()
            .enumerate()
            .map(|(i, debt)| DebtMonthState {
                id: debt.id,
                name: debt.name.clone(),
                balance: debt.principal,
                interest: interest[i],
                payment: payments[i],
                status: debt.status,
            })
            .collect();

        Ok(MonthSnapshot {
            month,
            date,
            total_balance: debts.iter().map(|d| d.principal).sum(),
            interest_this_month: interest.iter().sum(),
            payments_this_month: payments.iter().sum(),
            debts: states,
            paid_off_this_month: paid_off_names,
        })
    }
}

/// per-run bookkeeping that is not part of any debt
struct RunState {
    start: DateTime<Utc>,
    total_required: Money,
    events: EventStore,
    shortfall_reported: HashSet<DebtId>,
}

/// capitalize one month of interest on every debt
///
/// Every balance and running total is checked first; `None` means the month
/// would leave the decimal range and nothing was changed.
fn accrue_month(debts: &mut [Debt], interest_to_date: Money) -> Option<Vec<Money>> {
    let pending: Vec<Money> = debts
        .iter()
        .map(|d| if d.is_active() { d.monthly_interest().ok() } else { Some(Money::ZERO) })
        .collect::<Option<_>>()?;

    let mut total_balance = Money::ZERO;
    let mut month_interest = Money::ZERO;
    for (debt, interest) in debts.iter().zip(&pending) {
        total_balance = total_balance.checked_add(debt.principal.checked_add(*interest)?)?;
        debt.total_interest_paid.checked_add(*interest)?;
        month_interest = month_interest.checked_add(*interest)?;
    }
    interest_to_date.checked_add(month_interest)?;

    debts.iter_mut().map(|d| d.accrue_interest().ok()).collect()
}

fn validate_records(records: &[DebtRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(PayoffError::NoActiveDebts);
    }

    let mut ids = HashSet::new();
    for record in records {
        record.validate()?;
        if !ids.insert(record.id) {
            return Err(PayoffError::Validation {
                debt_id: record.id,
                message: "duplicate debt id".to_string(),
            });
        }
    }

    Ok(())
}

/// run one projection with the given configuration
pub fn simulate(
    records: &[DebtRecord],
    config: &SimulationConfig,
    time_provider: &SafeTimeProvider,
) -> Result<SimulationResult> {
    Simulator::new(config.clone()).run(records, time_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_MONTHS;
    use crate::decimal::Rate;
    use crate::strategy::Strategy;
    use crate::types::{Compounding, DebtStatus};
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rayon::prelude::*;
    use rust_decimal_macros::dec;

    fn clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn household() -> Vec<DebtRecord> {
        vec![
            DebtRecord::new(1, "Visa", money("4500"), Rate::from_decimal(dec!(0.2199)), money("135")),
            DebtRecord::new(2, "Car loan", money("12000"), Rate::from_decimal(dec!(0.0689)), money("310")),
            DebtRecord::new(3, "Store card", money("800"), Rate::from_decimal(dec!(0.2650)), money("40")),
            DebtRecord::new(4, "Student loan", money("18500"), Rate::from_decimal(dec!(0.0450)), money("190"))
                .with_compounding(Compounding::Daily),
            DebtRecord::new(5, "Medical", money("1200"), Rate::ZERO, money("50"))
                .with_compounding(Compounding::None),
        ]
    }

    fn run(records: &[DebtRecord], strategy: Strategy, extra: &str) -> SimulationResult {
        let config = SimulationConfig::new(strategy, money(extra));
        simulate(records, &config, &clock()).unwrap()
    }

    #[test]
    fn test_single_debt_first_month() {
        let records = vec![DebtRecord::new(
            1,
            "Card",
            money("1000.00"),
            Rate::from_decimal(dec!(0.12)),
            money("100.00"),
        )];

        let result = run(&records, Strategy::Avalanche, "0");
        let first = result.snapshot(1).unwrap();
        let card = first.debt(1).unwrap();

        assert_eq!(card.interest, money("10.00"));
        assert_eq!(card.payment, money("100.00"));
        assert_eq!(card.balance, money("910.00"));
        assert_eq!(first.principal_paid(), money("90.00"));
        assert_eq!(first.date, chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(result.summary.terminal_state, TerminalState::DebtFree);
        assert_eq!(result.months_to_zero(), 11);
    }

    #[test]
    fn test_extra_goes_to_highest_apr() {
        let records = vec![
            DebtRecord::new(1, "A", money("500"), Rate::from_decimal(dec!(0.20)), money("50")),
            DebtRecord::new(2, "B", money("2000"), Rate::from_decimal(dec!(0.10)), money("50")),
        ];

        let result = run(&records, Strategy::Avalanche, "50");
        let first = result.snapshot(1).unwrap();

        assert_eq!(first.debt(1).unwrap().payment, money("100"));
        assert_eq!(first.debt(2).unwrap().payment, money("50"));
        assert_eq!(first.payments_this_month, money("150"));
    }

    #[test]
    fn test_snowball_sends_extra_to_smallest_balance() {
        let records = vec![
            DebtRecord::new(1, "A", money("5000"), Rate::from_decimal(dec!(0.25)), money("100")),
            DebtRecord::new(2, "B", money("900"), Rate::from_decimal(dec!(0.05)), money("30")),
        ];

        let result = run(&records, Strategy::Snowball, "70");
        let first = result.snapshot(1).unwrap();

        assert_eq!(first.debt(1).unwrap().payment, money("100"));
        assert_eq!(first.debt(2).unwrap().payment, money("100"));
    }

    #[test]
    fn test_cascade_within_the_same_month() {
        // store card clears on its minimum with room to spare; the spare and
        // the extra roll straight into the next target in the same month
        let records = vec![
            DebtRecord::new(1, "Store", money("20"), Rate::ZERO, money("50")).with_compounding(Compounding::None),
            DebtRecord::new(2, "Card", money("1000"), Rate::from_decimal(dec!(0.24)), money("40")),
            DebtRecord::new(3, "Loan", money("3000"), Rate::from_decimal(dec!(0.06)), money("60")),
        ];

        let result = run(&records, Strategy::Avalanche, "100");
        let first = result.snapshot(1).unwrap();

        assert_eq!(first.debt(1).unwrap().payment, money("20"));
        assert_eq!(first.debt(1).unwrap().status, DebtStatus::Paid);
        // 40 minimum + 100 extra + 30 unused from the store card
        assert_eq!(first.debt(2).unwrap().payment, money("170"));
        assert_eq!(first.debt(3).unwrap().payment, money("60"));
        assert_eq!(first.payments_this_month, money("250"));
        assert_eq!(first.paid_off_this_month, vec!["Store".to_string()]);
    }

    #[test]
    fn test_cascade_after_target_clears() {
        let records = vec![
            DebtRecord::new(1, "Small", money("100"), Rate::from_decimal(dec!(0.30)), money("10")),
            DebtRecord::new(2, "Big", money("5000"), Rate::from_decimal(dec!(0.10)), money("100")),
        ];

        let result = run(&records, Strategy::Avalanche, "200");
        let first = result.snapshot(1).unwrap();

        // small: 102.50 owed, cleared with 10 minimum + 92.50 of the 200 extra
        assert_eq!(first.debt(1).unwrap().payment, money("102.5"));
        assert_eq!(first.debt(2).unwrap().payment, money("207.5"));
        assert_eq!(first.payments_this_month, money("310"));

        // from month two the whole 310 budget lands on the big loan
        let second = result.snapshot(2).unwrap();
        assert_eq!(second.debt(2).unwrap().payment, money("310"));
    }

    #[test]
    fn test_budget_is_constant_until_final_month() {
        let records = household();
        let result = run(&records, Strategy::Avalanche, "250");
        let budget: Money = records.iter().map(|r| r.min_payment).sum::<Money>() + money("250");

        let (last, rest) = result.snapshots.split_last().unwrap();
        for snapshot in rest {
            assert_eq!(snapshot.payments_this_month, budget, "month {}", snapshot.month);
        }
        assert!(last.payments_this_month <= budget);
        assert!(result.summary.is_debt_free());
    }

    #[test]
    fn test_balances_reconcile_every_month() {
        let records = household();
        let result = run(&records, Strategy::Hybrid, "120");

        for record in &records {
            let mut interest_to_date = Money::ZERO;
            let mut paid_to_date = Money::ZERO;
            for snapshot in &result.snapshots {
                let state = snapshot.debt(record.id).unwrap();
                interest_to_date += state.interest;
                paid_to_date += state.payment;
                assert_eq!(
                    record.principal + interest_to_date,
                    state.balance + paid_to_date,
                    "debt {} month {}",
                    record.id,
                    snapshot.month
                );
                assert!(!state.balance.is_negative());
                assert_eq!(state.status == DebtStatus::Paid, state.balance.is_zero());
            }
        }
    }

    #[test]
    fn test_paid_status_is_monotonic() {
        let result = run(&household(), Strategy::Snowball, "0");

        for id in 1..=5 {
            let mut seen_paid = false;
            for snapshot in &result.snapshots {
                let paid = snapshot.debt(id).unwrap().status == DebtStatus::Paid;
                assert!(!(seen_paid && !paid));
                seen_paid |= paid;
            }
            assert!(seen_paid);
        }
    }

    #[test]
    fn test_avalanche_pays_least_interest() {
        let records = household();
        let avalanche = run(&records, Strategy::Avalanche, "150");
        let snowball = run(&records, Strategy::Snowball, "150");
        let hybrid = run(&records, Strategy::Hybrid, "150");

        assert!(avalanche.total_interest_paid() <= snowball.total_interest_paid());
        assert!(avalanche.total_interest_paid() <= hybrid.total_interest_paid());
    }

    #[test]
    fn test_repeated_and_parallel_runs_are_identical() {
        let records = household();
        let reference = run(&records, Strategy::Hybrid, "75");

        let parallel: Vec<SimulationResult> = (0..4)
            .into_par_iter()
            .map(|_| run(&records, Strategy::Hybrid, "75"))
            .collect();

        for result in parallel {
            assert_eq!(result, reference);
            assert_eq!(result.to_json_pretty().unwrap(), reference.to_json_pretty().unwrap());
        }
    }

    #[test]
    fn test_underfunded_debt_hits_horizon() {
        let records = vec![DebtRecord::new(
            1,
            "Payday",
            money("10000"),
            Rate::from_decimal(dec!(0.36)),
            money("100"),
        )];
        let config = SimulationConfig::builder().max_months(36).build().unwrap();

        let result = simulate(&records, &config, &clock()).unwrap();

        assert_eq!(result.summary.terminal_state, TerminalState::HorizonExceeded);
        assert_eq!(result.months_to_zero(), 36);
        assert_eq!(result.snapshots.len(), 36);
        assert_eq!(result.summary.debt_free_date, None);
        assert!(result.summary.final_balance > money("10000"));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, Event::MinimumShortfall { debt_id: 1, month: 1, .. })));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, Event::HorizonExceeded { max_months: 36, .. })));
    }

    #[test]
    fn test_runaway_balance_stops_as_horizon_exceeded() {
        // 400% apr on a 10 minimum grows by a third every month
        let records = vec![DebtRecord::new(
            1,
            "Loan shark",
            money("1000"),
            Rate::from_decimal(dec!(4.0)),
            money("10"),
        )];

        let result = simulate(&records, &SimulationConfig::default(), &clock()).unwrap();

        assert_eq!(result.summary.terminal_state, TerminalState::HorizonExceeded);
        assert_eq!(result.months_to_zero(), DEFAULT_MAX_MONTHS);
        assert!((200..=215).contains(&result.snapshots.len()));

        let last = result.snapshots.last().unwrap();
        assert!(last.total_balance > money("1000000000000000000000000000"));
        assert_eq!(result.summary.final_balance, last.total_balance);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, Event::HorizonExceeded { max_months: DEFAULT_MAX_MONTHS, .. })));
    }

    #[test]
    fn test_unrepresentable_dates_are_rejected_up_front() {
        let records = household();

        let too_long = SimulationConfig::builder().max_months(5_000_000).build().unwrap();
        assert!(matches!(
            simulate(&records, &too_long, &clock()),
            Err(PayoffError::InvalidConfiguration { .. })
        ));

        let wide = SimulationConfig {
            month_spacing_days: 200_000_000,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            simulate(&records, &wide, &clock()),
            Err(PayoffError::InvalidConfiguration { .. })
        ));

        // long but representable horizons still run
        let long = SimulationConfig::builder().max_months(100_000).build().unwrap();
        assert!(simulate(&records, &long, &clock()).unwrap().summary.is_debt_free());
    }

    #[test]
    fn test_lump_sum_lands_in_its_month() {
        let records = vec![DebtRecord::new(
            1,
            "Card",
            money("5000"),
            Rate::from_decimal(dec!(0.18)),
            money("150"),
        )];
        let config = SimulationConfig::builder()
            .lump_sum(3, money("1000"))
            .build()
            .unwrap();

        let result = simulate(&records, &config, &clock()).unwrap();

        assert_eq!(result.snapshot(2).unwrap().payments_this_month, money("150"));
        assert_eq!(result.snapshot(3).unwrap().payments_this_month, money("1150"));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, Event::LumpSumApplied { month: 3, .. })));
    }

    #[test]
    fn test_custom_order_is_followed() {
        let records = household();
        let result = run(&records, Strategy::Custom { order: vec![4, 2, 1, 3, 5] }, "300");
        let first = result.snapshot(1).unwrap();

        assert_eq!(first.debt(4).unwrap().payment, money("490"));
        assert_eq!(result.summary.strategy_used, Strategy::Custom { order: vec![4, 2, 1, 3, 5] });
    }

    #[test]
    fn test_caller_records_are_untouched() {
        let records = household();
        let before = records.clone();
        let _ = run(&records, Strategy::Avalanche, "100");
        assert_eq!(records, before);
    }

    #[test]
    fn test_input_errors() {
        let config = SimulationConfig::default();
        let time = clock();

        assert_eq!(simulate(&[], &config, &time).unwrap_err(), PayoffError::NoActiveDebts);

        let cleared = vec![DebtRecord::new(1, "Done", Money::ZERO, Rate::ZERO, money("10"))];
        assert_eq!(simulate(&cleared, &config, &time).unwrap_err(), PayoffError::NoActiveDebts);

        let mut bad = household();
        bad[2].min_payment = Money::ZERO;
        assert!(simulate(&bad, &config, &time).unwrap_err().is_validation());

        let mut duplicate = household();
        duplicate[1].id = 1;
        assert!(matches!(
            simulate(&duplicate, &config, &time),
            Err(PayoffError::Validation { debt_id: 1, .. })
        ));

        let custom = config.with_strategy(Strategy::Custom { order: vec![1, 2, 42] });
        assert!(matches!(
            simulate(&household(), &custom, &time),
            Err(PayoffError::InvalidCustomOrder { .. })
        ));
    }
}
