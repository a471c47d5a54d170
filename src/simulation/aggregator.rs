use chrono::NaiveDate;
use serde::Serialize;

use crate::debt::Debt;
use crate::decimal::Money;
use crate::errors::{overflow, Result};
use crate::events::Event;
use crate::simulation::snapshot::MonthSnapshot;
use crate::strategy::Strategy;
use crate::types::{DebtId, DebtStatus, TerminalState};

/// final figures for one debt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtSummary {
    pub id: DebtId,
    pub name: String,
    pub final_balance: Money,
    pub months_paid: u32,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    pub status: DebtStatus,
}

impl DebtSummary {
    fn from_debt(debt: &Debt) -> Self {
        Self {
            id: debt.id,
            name: debt.name.clone(),
            final_balance: debt.principal,
            months_paid: debt.months_paid,
            total_interest_paid: debt.total_interest_paid,
            total_paid: debt.total_paid,
            status: debt.status,
        }
    }
}

/// headline metrics of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// months simulated, or the cap when the horizon was exceeded
    pub months_to_zero: u32,
    pub debt_free_date: Option<NaiveDate>,
    pub total_interest_paid: Money,
    pub total_payments_made: Money,
    pub final_balance: Money,
    pub strategy_used: Strategy,
    pub terminal_state: TerminalState,
    pub debts: Vec<DebtSummary>,
}

impl Summary {
    pub fn is_debt_free(&self) -> bool {
        self.terminal_state == TerminalState::DebtFree
    }
}

/// complete outcome of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub snapshots: Vec<MonthSnapshot>,
    pub summary: Summary,
    pub events: Vec<Event>,
}

/// chart row: month totals and debts cleared
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub month: u32,
    pub date: NaiveDate,
    pub total_balance: Money,
    pub interest_paid: Money,
    pub payments_made: Money,
    pub debts_paid_off: Vec<String>,
}

/// chart row: balance with the interest / principal split of the month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceTrendPoint {
    pub month: u32,
    pub date: NaiveDate,
    pub total_balance: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
}

impl SimulationResult {
    pub fn months_to_zero(&self) -> u32 {
        self.summary.months_to_zero
    }

    pub fn total_interest_paid(&self) -> Money {
        self.summary.total_interest_paid
    }

    pub fn snapshot(&self, month: u32) -> Option<&MonthSnapshot> {
        month
            .checked_sub(1)
            .and_then(|index| self.snapshots.get(index as usize))
    }

    pub fn debt_summary(&self, id: DebtId) -> Option<&DebtSummary> {
        self.summary.debts.iter().find(|d| d.id == id)
    }

    pub fn timeline(&self) -> Vec<TimelinePoint> {
        self.snapshots
            .iter()
            .map(|s| TimelinePoint {
                month: s.month,
                date: s.date,
                total_balance: s.total_balance,
                interest_paid: s.interest_this_month,
                payments_made: s.payments_this_month,
                debts_paid_off: s.paid_off_this_month.clone(),
            })
            .collect()
    }

    pub fn balance_trend(&self) -> Vec<BalanceTrendPoint> {
        self.snapshots
            .iter()
            .map(|s| BalanceTrendPoint {
                month: s.month,
                date: s.date,
                total_balance: s.total_balance,
                interest_paid: s.interest_this_month,
                principal_paid: s.principal_paid(),
            })
            .collect()
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// collects month snapshots and running totals, then builds the result
#[derive(Debug)]
pub struct ResultAggregator {
    strategy: Strategy,
    snapshots: Vec<MonthSnapshot>,
    total_interest: Money,
    total_payments: Money,
}

impl ResultAggregator {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            snapshots: Vec::new(),
            total_interest: Money::ZERO,
            total_payments: Money::ZERO,
        }
    }

    pub fn record(&mut self, snapshot: MonthSnapshot) -> Result<()> {
        self.total_interest = self
            .total_interest
            .checked_add(snapshot.interest_this_month)
            .ok_or_else(|| overflow("interest total"))?;
        self.total_payments = self
            .total_payments
            .checked_add(snapshot.payments_this_month)
            .ok_or_else(|| overflow("payment total"))?;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn months_recorded(&self) -> u32 {
        self.snapshots.len() as u32
    }

    pub fn total_interest(&self) -> Money {
        self.total_interest
    }

    pub fn total_payments(&self) -> Money {
        self.total_payments
    }

    pub fn finish(
        self,
        debts: &[Debt],
        terminal_state: TerminalState,
        max_months: u32,
        events: Vec<Event>,
    ) -> SimulationResult {
        let (months_to_zero, debt_free_date) = match terminal_state {
            TerminalState::DebtFree => (
                self.snapshots.len() as u32,
                self.snapshots.last().map(|s| s.date),
            ),
            TerminalState::HorizonExceeded => (max_months, None),
        };

        let summary = Summary {
            months_to_zero,
            debt_free_date,
            total_interest_paid: self.total_interest,
            total_payments_made: self.total_payments,
            final_balance: debts.iter().map(|d| d.principal).sum(),
            strategy_used: self.strategy,
            terminal_state,
            debts: debts.iter().map(DebtSummary::from_debt).collect(),
        };

        SimulationResult {
            snapshots: self.snapshots,
            summary,
            events,
        }
    }
}
