use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::DebtId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayoffError {
    #[error("no active debts to simulate")]
    NoActiveDebts,

    #[error("invalid debt {debt_id}: {message}")]
    Validation {
        debt_id: DebtId,
        message: String,
    },

    #[error("negative principal on debt {debt_id}: {principal}")]
    NegativePrincipal {
        debt_id: DebtId,
        principal: Money,
    },

    #[error("invalid interest rate on debt {debt_id}: {rate}")]
    InvalidInterestRate {
        debt_id: DebtId,
        rate: Rate,
    },

    #[error("minimum payment must be positive on debt {debt_id}: {min_payment}")]
    InvalidMinimumPayment {
        debt_id: DebtId,
        min_payment: Money,
    },

    #[error("invalid custom order: {message}")]
    InvalidCustomOrder {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },
}

impl PayoffError {
    /// true for the input-contract violations raised before a run starts
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PayoffError::Validation { .. }
                | PayoffError::NegativePrincipal { .. }
                | PayoffError::InvalidInterestRate { .. }
                | PayoffError::InvalidMinimumPayment { .. }
        )
    }
}

/// arithmetic left the range of the decimal type
pub(crate) fn overflow(context: &str) -> PayoffError {
    PayoffError::CalculationError {
        message: format!("{context} overflowed"),
    }
}

pub type Result<T> = std::result::Result<T, PayoffError>;
