/// quick start - project a payoff plan for a few debts
use debt_payoff_rs::{simulate, DebtRecord, Money, Rate, SafeTimeProvider, SimulationConfig, Strategy, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let debts = vec![
        DebtRecord::new(1, "Visa", Money::from_major(4_500), Rate::from_percent("21.99".parse()?), Money::from_major(135)),
        DebtRecord::new(2, "Car loan", Money::from_major(12_000), Rate::from_percent("6.89".parse()?), Money::from_major(310)),
        DebtRecord::new(3, "Store card", Money::from_major(800), Rate::from_percent("26.5".parse()?), Money::from_major(40)),
    ];

    // production: use system time (default)
    let time = SafeTimeProvider::new(TimeSource::System);
    let config = SimulationConfig::new(Strategy::Avalanche, Money::from_major(200));

    let result = simulate(&debts, &config, &time)?;

    println!("debt free in {} months", result.months_to_zero());
    println!("total interest: ${}", result.total_interest_paid().round_dp(2));
    if let Some(date) = result.summary.debt_free_date {
        println!("debt free on {}", date);
    }

    for point in result.timeline().iter().filter(|p| !p.debts_paid_off.is_empty()) {
        println!("month {:>3}: paid off {}", point.month, point.debts_paid_off.join(", "));
    }

    Ok(())
}
