use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// identifier of a debt as assigned by the record store
pub type DebtId = u64;

/// how a debt's annual rate turns into monthly interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    /// apr / 12 per month
    #[default]
    Monthly,
    /// (1 + apr/365)^30 - 1 per month
    Daily,
    /// interest free
    None,
}

/// debt status, monotonic within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Active,
    Paid,
}

/// how a simulation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// every balance reached zero
    DebtFree,
    /// the month cap was reached with balance outstanding
    HorizonExceeded,
}

/// payment application result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaymentApplication {
    pub to_interest: Money,
    pub to_principal: Money,
    pub excess: Money,
}

impl PaymentApplication {
    pub fn total_applied(&self) -> Money {
        self.to_interest + self.to_principal
    }
}
