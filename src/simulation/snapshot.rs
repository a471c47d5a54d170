use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{PayoffError, Result};
use crate::types::{DebtId, DebtStatus};

/// one debt's figures for one simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtMonthState {
    pub id: DebtId,
    pub name: String,
    /// balance after this month's payments
    pub balance: Money,
    pub interest: Money,
    pub payment: Money,
    pub status: DebtStatus,
}

/// state of every debt at the end of a simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSnapshot {
    /// 1-based month index
    pub month: u32,
    pub date: NaiveDate,
    pub debts: Vec<DebtMonthState>,
    pub total_balance: Money,
    pub interest_this_month: Money,
    pub payments_this_month: Money,
    pub paid_off_this_month: Vec<String>,
}

impl MonthSnapshot {
    pub fn debt(&self, id: DebtId) -> Option<&DebtMonthState> {
        self.debts.iter().find(|d| d.id == id)
    }

    /// payments minus interest; negative when interest outran payments
    pub fn principal_paid(&self) -> Money {
        self.payments_this_month - self.interest_this_month
    }
}

/// projected date of a month, fixed spacing from the start instant
pub fn projected_date(start: DateTime<Utc>, month: u32, spacing_days: u32) -> Result<NaiveDate> {
    i64::from(month.saturating_sub(1))
        .checked_mul(i64::from(spacing_days))
        .and_then(Duration::try_days)
        .and_then(|offset| start.checked_add_signed(offset))
        .map(|date| date.date_naive())
        .ok_or_else(|| PayoffError::InvalidConfiguration {
            message: format!("month {month} at {spacing_days}-day spacing is past the last representable date"),
        })
}
