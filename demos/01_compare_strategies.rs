/// compare strategies - avalanche vs snowball vs hybrid, plus the value of paying more
use chrono::{TimeZone, Utc};
use debt_payoff_rs::{
    compare_strategies, extra_payment_impact, top_targets, DebtRecord, Money, Rate,
    SafeTimeProvider, SimulationConfig, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== strategy comparison ===\n");

    // controlled time so the dates are reproducible
    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));

    let debts = vec![
        DebtRecord::new(1, "Visa", Money::from_major(6_200), Rate::from_percentage(24), Money::from_major(186)),
        DebtRecord::new(2, "Store card", Money::from_major(650), Rate::from_percentage(19), Money::from_major(30)),
        DebtRecord::new(3, "Personal loan", Money::from_major(9_800), Rate::from_percentage(11), Money::from_major(240)),
        DebtRecord::new(4, "Medical", Money::from_major(1_400), Rate::ZERO, Money::from_major(60)),
    ];
    let config = SimulationConfig::builder().extra_payment(Money::from_major(250)).build()?;

    let comparison = compare_strategies(&debts, &config, &time)?;
    for outcome in &comparison.outcomes {
        println!(
            "{:<10} {:>3} months  interest ${:>10}  vs avalanche ${}",
            outcome.strategy.name(),
            outcome.months_to_zero,
            outcome.total_interest_paid.round_dp(2),
            outcome.interest_vs_avalanche.round_dp(2),
        );
    }
    println!("\nlowest interest: {}, fastest: {}", comparison.lowest_interest, comparison.fastest);

    println!("\nfirst targets:");
    for target in top_targets(&debts)? {
        println!("  {:<10} -> {} (${})", target.strategy.name(), target.name, target.balance);
    }

    let impact = extra_payment_impact(&debts, &config, Money::from_major(100), &time)?;
    println!(
        "\nanother $100/month saves {} months and ${} interest (roi {})",
        impact.months_saved,
        impact.interest_saved.round_dp(2),
        impact.roi
    );

    Ok(())
}
