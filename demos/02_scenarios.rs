/// scenarios - job loss, windfall, rate change and a consolidation offer
use chrono::{TimeZone, Utc};
use debt_payoff_rs::{
    analyze_consolidation, run_scenario, ConsolidationOffer, DebtRecord, Decimal, Money, Rate,
    SafeTimeProvider, Scenario, SimulationConfig, Strategy, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== scenario analysis ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));

    let debts = vec![
        DebtRecord::new(1, "Visa", Money::from_major(3_000), Rate::from_percentage(22), Money::from_major(90)),
        DebtRecord::new(2, "Personal loan", Money::from_major(6_000), Rate::from_percentage(11), Money::from_major(180)),
    ];
    let config = SimulationConfig::new(Strategy::Snowball, Money::from_major(100));

    let scenarios = [
        Scenario::JobLoss { income_factor: Decimal::new(6, 1) },
        Scenario::Windfall { amount: Money::from_major(2_000), month: 6 },
        Scenario::RateChange { new_apr: Rate::from_percentage(15), affected: vec![] },
    ];

    for scenario in &scenarios {
        let outcome = run_scenario(&debts, &config, scenario, &time)?;
        println!(
            "{:<12} {:>3} -> {:>3} months ({:+}), interest delta ${}",
            scenario.name(),
            outcome.baseline.months_to_zero(),
            outcome.adjusted.months_to_zero(),
            outcome.months_delta,
            outcome.interest_delta.round_dp(2),
        );
    }

    let offer = ConsolidationOffer {
        apr: Rate::from_percentage(9),
        term_months: 60,
    };
    let analysis = analyze_consolidation(&debts, &config, offer, &time)?;
    println!(
        "\nconsolidation at {}: ${} / month, interest ${} vs ${} today, worth it: {}",
        offer.apr,
        analysis.monthly_payment.round_dp(2),
        analysis.total_interest.round_dp(2),
        analysis.current_interest.round_dp(2),
        analysis.is_beneficial()
    );

    Ok(())
}
