use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{PayoffError, Result};
use crate::interest::{DAYS_PER_MONTH, DAYS_PER_YEAR};
use crate::strategy::Strategy;

/// horizon used when the caller does not pick one (fifty years)
pub const DEFAULT_MAX_MONTHS: u32 = 600;

/// simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub strategy: Strategy,
    /// paid every month on top of the minimums
    pub extra_payment: Money,
    pub max_months: u32,
    /// spacing between projected snapshot dates
    pub month_spacing_days: u32,
    /// one-time amounts added to a given month's budget (1-based month)
    #[serde(default)]
    pub lump_sums: BTreeMap<u32, Money>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Avalanche,
            extra_payment: Money::ZERO,
            max_months: DEFAULT_MAX_MONTHS,
            month_spacing_days: DAYS_PER_MONTH,
            lump_sums: BTreeMap::new(),
        }
    }
}

impl SimulationConfig {
    pub fn new(strategy: Strategy, extra_payment: Money) -> Self {
        Self {
            strategy,
            extra_payment,
            ..Self::default()
        }
    }

    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::new()
    }

    /// same configuration with a different strategy
    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    /// same configuration with a different monthly extra payment
    pub fn with_extra_payment(&self, extra_payment: Money) -> Self {
        Self {
            extra_payment,
            ..self.clone()
        }
    }

    /// one-time amount scheduled for a month, zero if none
    pub fn lump_sum(&self, month: u32) -> Money {
        self.lump_sums.get(&month).copied().unwrap_or(Money::ZERO)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_months == 0 {
            return Err(PayoffError::InvalidConfiguration {
                message: "max_months must be at least 1".to_string(),
            });
        }

        if self.extra_payment.is_negative() {
            return Err(PayoffError::InvalidConfiguration {
                message: format!("extra payment must not be negative: {}", self.extra_payment),
            });
        }

        if self.month_spacing_days == 0 || self.month_spacing_days > DAYS_PER_YEAR {
            return Err(PayoffError::InvalidConfiguration {
                message: format!(
                    "month spacing must be between 1 and {DAYS_PER_YEAR} days: {}",
                    self.month_spacing_days
                ),
            });
        }

        for (month, amount) in &self.lump_sums {
            if *month == 0 {
                return Err(PayoffError::InvalidConfiguration {
                    message: "lump sum months are 1-based".to_string(),
                });
            }
            if !amount.is_positive() {
                return Err(PayoffError::InvalidConfiguration {
                    message: format!("lump sum for month {month} must be positive: {amount}"),
                });
            }
        }

        Ok(())
    }
}

/// builder for simulation configurations
#[derive(Debug, Clone, Default)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn extra_payment(mut self, amount: Money) -> Self {
        self.config.extra_payment = amount;
        self
    }

    pub fn max_months(mut self, months: u32) -> Self {
        self.config.max_months = months;
        self
    }

    pub fn month_spacing_days(mut self, days: u32) -> Self {
        self.config.month_spacing_days = days;
        self
    }

    /// schedule a one-time payment; repeated calls for a month accumulate
    pub fn lump_sum(mut self, month: u32, amount: Money) -> Self {
        *self.config.lump_sums.entry(month).or_insert(Money::ZERO) += amount;
        self
    }

    pub fn build(self) -> Result<SimulationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
