pub mod rules;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::debt::Debt;
use crate::errors::{PayoffError, Result};
use crate::types::DebtId;

pub use rules::{Avalanche, CustomOrder, Hybrid, PriorityRule, Snowball};

/// repayment prioritization strategy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// highest apr first, minimizes interest
    #[default]
    Avalanche,
    /// smallest balance first
    Snowball,
    /// lowest balance / sqrt(apr) first
    Hybrid,
    /// explicit order of debt ids
    Custom { order: Vec<DebtId> },
}

impl Strategy {
    /// the strategies every comparison runs
    pub const BUILT_IN: [Strategy; 3] = [Strategy::Avalanche, Strategy::Snowball, Strategy::Hybrid];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Avalanche => "avalanche",
            Strategy::Snowball => "snowball",
            Strategy::Hybrid => "hybrid",
            Strategy::Custom { .. } => "custom",
        }
    }

    /// parse a built-in strategy name as stored by callers
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "avalanche" => Ok(Strategy::Avalanche),
            "snowball" => Ok(Strategy::Snowball),
            "hybrid" => Ok(Strategy::Hybrid),
            other => Err(PayoffError::InvalidConfiguration {
                message: format!("unknown strategy: {other}"),
            }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// orders active debts for a strategy; never mutates them
pub struct StrategySelector {
    rule: Box<dyn PriorityRule>,
}

impl StrategySelector {
    /// build a selector for the given debt set
    ///
    /// A custom order must name every active debt exactly once and nothing
    /// else, paid debts included.
    pub fn new(strategy: &Strategy, debts: &[Debt]) -> Result<Self> {
        let rule: Box<dyn PriorityRule> = match strategy {
            Strategy::Avalanche => Box::new(Avalanche),
            Strategy::Snowball => Box::new(Snowball),
            Strategy::Hybrid => Box::new(Hybrid),
            Strategy::Custom { order } => {
                validate_custom_order(order, debts)?;
                Box::new(CustomOrder::new(order))
            }
        };

        Ok(Self { rule })
    }

    /// active debts in payoff priority order
    pub fn order<'a>(&self, debts: &'a [Debt]) -> Vec<&'a Debt> {
        let mut active: Vec<&Debt> = debts.iter().filter(|d| d.is_active()).collect();
        active.sort_by(|a, b| self.rule.compare(a, b));
        active
    }

    pub fn order_ids(&self, debts: &[Debt]) -> Vec<DebtId> {
        self.order(debts).into_iter().map(|d| d.id).collect()
    }

    /// top-priority active debt
    pub fn top<'a>(&self, debts: &'a [Debt]) -> Option<&'a Debt> {
        self.top_index(debts).map(|index| &debts[index])
    }

    /// index into `debts` of the top-priority active debt
    pub fn top_index(&self, debts: &[Debt]) -> Option<usize> {
        debts
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_active())
            .min_by(|(_, a), (_, b)| self.rule.compare(a, b))
            .map(|(index, _)| index)
    }
}

fn validate_custom_order(order: &[DebtId], debts: &[Debt]) -> Result<()> {
    let active: HashSet<DebtId> = debts.iter().filter(|d| d.is_active()).map(|d| d.id).collect();
    let mut seen = HashSet::new();

    for id in order {
        if !active.contains(id) {
            return Err(PayoffError::InvalidCustomOrder {
                message: format!("debt id {id} is unknown or already paid"),
            });
        }
        if !seen.insert(*id) {
            return Err(PayoffError::InvalidCustomOrder {
                message: format!("debt id {id} listed more than once"),
            });
        }
    }

    let mut missing: Vec<DebtId> = debts
        .iter()
        .filter(|d| d.is_active() && !seen.contains(&d.id))
        .map(|d| d.id)
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(PayoffError::InvalidCustomOrder {
            message: format!("active debts missing from order: {missing:?}"),
        });
    }

    Ok(())
}
