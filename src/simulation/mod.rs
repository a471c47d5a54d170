pub mod aggregator;
pub mod engine;
pub mod snapshot;

pub use aggregator::{
    BalanceTrendPoint, DebtSummary, ResultAggregator, SimulationResult, Summary, TimelinePoint,
};
pub use engine::{simulate, Simulator};
pub use snapshot::{projected_date, DebtMonthState, MonthSnapshot};
