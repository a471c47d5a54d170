use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::DebtId;

/// all events that can be emitted during a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // run lifecycle
    SimulationStarted {
        strategy: String,
        debt_count: usize,
        monthly_budget: Money,
        start_date: NaiveDate,
    },
    SimulationCompleted {
        months: u32,
        total_interest: Money,
        total_payments: Money,
    },
    HorizonExceeded {
        max_months: u32,
        remaining_balance: Money,
    },

    // per-debt events
    MinimumShortfall {
        debt_id: DebtId,
        month: u32,
        min_payment: Money,
        interest: Money,
    },
    DebtPaidOff {
        debt_id: DebtId,
        name: String,
        month: u32,
        date: NaiveDate,
    },

    // budget events
    LumpSumApplied {
        month: u32,
        amount: Money,
    },
    BudgetUnspent {
        month: u32,
        amount: Money,
    },
}

/// event store for collecting events during a run
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_events_drains_store() {
        let mut store = EventStore::new();
        store.emit(Event::LumpSumApplied {
            month: 3,
            amount: Money::from_major(500),
        });

        assert_eq!(store.events().len(), 1);
        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.events().is_empty());
    }
}
