use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::debt::Debt;
use crate::types::DebtId;

/// total order over active debts, `Less` means paid first
pub trait PriorityRule: Send + Sync {
    fn compare(&self, a: &Debt, b: &Debt) -> Ordering;
}

/// highest apr first; ties by larger balance, then lower id
#[derive(Debug, Clone, Copy, Default)]
pub struct Avalanche;

impl PriorityRule for Avalanche {
    fn compare(&self, a: &Debt, b: &Debt) -> Ordering {
        b.apr
            .cmp(&a.apr)
            .then_with(|| b.principal.cmp(&a.principal))
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// smallest balance first; ties by higher apr, then lower id
#[derive(Debug, Clone, Copy, Default)]
pub struct Snowball;

impl PriorityRule for Snowball {
    fn compare(&self, a: &Debt, b: &Debt) -> Ordering {
        a.principal
            .cmp(&b.principal)
            .then_with(|| b.apr.cmp(&a.apr))
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// lowest balance / sqrt(apr) first, same tie-break as snowball
#[derive(Debug, Clone, Copy, Default)]
pub struct Hybrid;

impl Hybrid {
    /// apr-adjusted balance; `None` stands for an unbounded score (zero apr)
    pub fn score(debt: &Debt) -> Option<Decimal> {
        let root = debt.apr.sqrt()?;
        if root.is_zero() {
            return None;
        }
        debt.principal.as_decimal().checked_div(root)
    }
}

impl PriorityRule for Hybrid {
    fn compare(&self, a: &Debt, b: &Debt) -> Ordering {
        let by_score = match (Hybrid::score(a), Hybrid::score(b)) {
            (Some(sa), Some(sb)) => sa.cmp(&sb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        by_score.then_with(|| Snowball.compare(a, b))
    }
}

/// caller-supplied order, already validated against the debt set
#[derive(Debug, Clone, Default)]
pub struct CustomOrder {
    positions: HashMap<DebtId, usize>,
}

impl CustomOrder {
    pub fn new(order: &[DebtId]) -> Self {
        let positions = order
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, position))
            .collect();
        Self { positions }
    }

    fn position(&self, id: DebtId) -> usize {
        self.positions.get(&id).copied().unwrap_or(usize::MAX)
    }
}

impl PriorityRule for CustomOrder {
    fn compare(&self, a: &Debt, b: &Debt) -> Ordering {
        self.position(a.id)
            .cmp(&self.position(b.id))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debt::DebtRecord;
    use crate::decimal::{Money, Rate};
    use rust_decimal_macros::dec;

    fn debt(id: DebtId, principal: i64, apr: Decimal) -> Debt {
        Debt::from_record(&DebtRecord::new(
            id,
            format!("debt-{id}"),
            Money::from_major(principal),
            Rate::from_decimal(apr),
            Money::from_major(25),
        ))
    }

    #[test]
    fn test_avalanche_tie_breaks() {
        let a = debt(1, 1_000, dec!(0.20));
        let b = debt(2, 3_000, dec!(0.20));
        let c = debt(3, 3_000, dec!(0.20));

        // equal apr: larger balance first, then lower id
        assert_eq!(Avalanche.compare(&b, &a), Ordering::Less);
        assert_eq!(Avalanche.compare(&b, &c), Ordering::Less);
        assert_eq!(Avalanche.compare(&c, &b), Ordering::Greater);
    }

    #[test]
    fn test_snowball_tie_breaks() {
        let a = debt(1, 500, dec!(0.10));
        let b = debt(2, 500, dec!(0.25));

        assert_eq!(Snowball.compare(&b, &a), Ordering::Less);
        assert_eq!(Snowball.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_hybrid_score() {
        let small_cheap = debt(1, 1_000, dec!(0.04)); // 1000 / 0.2 = 5000
        let large_dear = debt(2, 2_000, dec!(0.25)); // 2000 / 0.5 = 4000

        let score = Hybrid::score(&large_dear).unwrap();
        assert!((score - dec!(4000)).abs() < dec!(0.0001));
        assert_eq!(Hybrid.compare(&large_dear, &small_cheap), Ordering::Less);
    }

    #[test]
    fn test_hybrid_zero_apr_ranks_last() {
        let free = debt(1, 100, dec!(0));
        let costly = debt(2, 50_000, dec!(0.01));

        assert_eq!(Hybrid::score(&free), None);
        assert_eq!(Hybrid.compare(&costly, &free), Ordering::Less);
    }

    #[test]
    fn test_custom_order() {
        let rule = CustomOrder::new(&[3, 1, 2]);
        let one = debt(1, 100, dec!(0.1));
        let three = debt(3, 100, dec!(0.1));

        assert_eq!(rule.compare(&three, &one), Ordering::Less);
    }
}
