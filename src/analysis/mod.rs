//! Analyses built from repeated, independent engine runs.

pub mod compare;
pub mod consolidation;
pub mod insights;
pub mod scenario;

pub use compare::{
    compare_strategies, extra_payment_impact, ExtraPaymentImpact, StrategyComparison,
    StrategyOutcome,
};
pub use consolidation::{analyze_consolidation, ConsolidationAnalysis, ConsolidationOffer};
pub use insights::{marginal_benefit, recommend, top_targets, MarginalBenefit, Recommendation};
pub use scenario::{run_scenario, Scenario, ScenarioOutcome};
