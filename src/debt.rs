use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{overflow, PayoffError, Result};
use crate::interest::{policy_for, InterestCalculation};
use crate::types::{Compounding, DebtId, DebtStatus, PaymentApplication};

/// debt as handed over by the record store, apr already a fraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRecord {
    pub id: DebtId,
    pub name: String,
    pub principal: Money,
    pub apr: Rate,
    pub min_payment: Money,
    #[serde(default)]
    pub compounding: Compounding,
}

impl DebtRecord {
    /// create a monthly-compounding record
    pub fn new(
        id: DebtId,
        name: impl Into<String>,
        principal: Money,
        apr: Rate,
        min_payment: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            principal,
            apr,
            min_payment,
            compounding: Compounding::Monthly,
        }
    }

    pub fn with_compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = compounding;
        self
    }

    /// check the input contract; violations are never clamped
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PayoffError::Validation {
                debt_id: self.id,
                message: "name must not be empty".to_string(),
            });
        }

        if self.principal.is_negative() {
            return Err(PayoffError::NegativePrincipal {
                debt_id: self.id,
                principal: self.principal,
            });
        }

        if self.apr.is_negative() {
            return Err(PayoffError::InvalidInterestRate {
                debt_id: self.id,
                rate: self.apr,
            });
        }

        if !self.min_payment.is_positive() {
            return Err(PayoffError::InvalidMinimumPayment {
                debt_id: self.id,
                min_payment: self.min_payment,
            });
        }

        Ok(())
    }
}

/// working copy of a debt owned by a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Debt {
    pub id: DebtId,
    pub name: String,
    pub principal: Money,
    pub original_principal: Money,
    pub apr: Rate,
    pub min_payment: Money,
    pub compounding: Compounding,
    pub status: DebtStatus,
    pub months_paid: u32,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    // interest capitalized this month and not yet covered by a payment
    unpaid_interest: Money,
    paid_this_month: bool,
}

impl Debt {
    pub fn from_record(record: &DebtRecord) -> Self {
        let status = if record.principal.is_zero() {
            DebtStatus::Paid
        } else {
            DebtStatus::Active
        };

        Self {
            id: record.id,
            name: record.name.clone(),
            principal: record.principal,
            original_principal: record.principal,
            apr: record.apr,
            min_payment: record.min_payment,
            compounding: record.compounding,
            status,
            months_paid: 0,
            total_interest_paid: Money::ZERO,
            total_paid: Money::ZERO,
            unpaid_interest: Money::ZERO,
            paid_this_month: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DebtStatus::Active
    }

    /// interest one month would add to the current balance
    pub fn monthly_interest(&self) -> Result<Money> {
        Ok(self.interest_calculation()?.interest_amount)
    }

    pub fn interest_calculation(&self) -> Result<InterestCalculation> {
        policy_for(self.compounding).calculate_monthly(self.principal, self.apr)
    }

    /// true when the minimum alone never gets ahead of interest
    pub fn is_underfunded(&self) -> Result<bool> {
        Ok(self.min_payment <= self.monthly_interest()?)
    }

    /// capitalize this month's interest into the balance
    ///
    /// Called once per month before any payment. Paid debts accrue nothing.
    /// On overflow the debt is left as it was.
    pub fn accrue_interest(&mut self) -> Result<Money> {
        self.paid_this_month = false;
        self.unpaid_interest = Money::ZERO;

        if !self.is_active() {
            return Ok(Money::ZERO);
        }

        let interest = self.monthly_interest()?;
        let principal = self
            .principal
            .checked_add(interest)
            .ok_or_else(|| overflow("debt balance"))?;
        let total_interest_paid = self
            .total_interest_paid
            .checked_add(interest)
            .ok_or_else(|| overflow("debt interest total"))?;

        self.principal = principal;
        self.total_interest_paid = total_interest_paid;
        self.unpaid_interest = interest;
        Ok(interest)
    }

    /// apply a payment against the interest-inclusive balance
    ///
    /// Interest accrued this month is covered first, the rest reduces
    /// principal. Never applies more than the balance; the surplus comes back
    /// as `excess`. A payment below the month's interest leaves the balance
    /// higher than last month, which is the expected outcome for an
    /// under-paid debt.
    pub fn apply_payment(&mut self, amount: Money) -> PaymentApplication {
        if !self.is_active() || !amount.is_positive() {
            return PaymentApplication {
                excess: amount.max(Money::ZERO),
                ..PaymentApplication::default()
            };
        }

        let applied = amount.min(self.principal);
        let to_interest = applied.min(self.unpaid_interest);
        let to_principal = applied - to_interest;

        self.unpaid_interest -= to_interest;
        self.principal -= applied;
        self.total_paid += applied;

        if !self.paid_this_month {
            self.months_paid += 1;
            self.paid_this_month = true;
        }

        if self.principal.is_zero() {
            self.status = DebtStatus::Paid;
        }

        PaymentApplication {
            to_interest,
            to_principal,
            excess: amount - applied,
        }
    }
}
