pub mod analysis;
pub mod config;
pub mod debt;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod simulation;
pub mod strategy;
pub mod types;

// re-export key types
pub use analysis::{
    analyze_consolidation, compare_strategies, extra_payment_impact, marginal_benefit, recommend,
    run_scenario, top_targets, ConsolidationAnalysis, ConsolidationOffer, ExtraPaymentImpact,
    MarginalBenefit, Recommendation, Scenario, ScenarioOutcome, StrategyComparison,
    StrategyOutcome,
};
pub use config::{SimulationConfig, SimulationConfigBuilder, DEFAULT_MAX_MONTHS};
pub use debt::{Debt, DebtRecord};
pub use decimal::{Money, Rate};
pub use errors::{PayoffError, Result};
pub use events::{Event, EventStore};
pub use interest::{
    effective_annual_rate, AccrualPolicy, DailyCompounding, InterestCalculation,
    MonthlyCompounding, NoInterest,
};
pub use simulation::{
    simulate, BalanceTrendPoint, DebtMonthState, DebtSummary, MonthSnapshot, SimulationResult,
    Simulator, Summary, TimelinePoint,
};
pub use strategy::{Strategy, StrategySelector};
pub use types::{Compounding, DebtId, DebtStatus, PaymentApplication, TerminalState};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
