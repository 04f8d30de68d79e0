use anyhow::Result;
use brand_savings_core::IntakeController;
use brand_savings_core::estimator::Multipliers;
use brand_savings_core::estimator::base_waste;
use clap::Parser;
use serde::Serialize;

use crate::args::AnswerArgs;
use crate::render;

/// Print the waste estimate for a set of answers.
#[derive(Debug, Parser)]
pub struct EstimateCli {
    #[command(flatten)]
    answers: AnswerArgs,

    /// Emit JSON instead of a human-readable summary.
    #[arg(long = "json", default_value_t = false)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct EstimateReport {
    monthly_spend: u32,
    estimated_waste: String,
    amount: String,
    base_waste: String,
    multipliers: Multipliers,
}

pub fn run(cli: EstimateCli) -> Result<()> {
    let mut controller = IntakeController::new();
    cli.answers.apply(&mut controller)?;
    let input = controller.input();
    let estimate = controller.estimate();

    if cli.json {
        let report = EstimateReport {
            monthly_spend: input.monthly_spend.dollars(),
            estimated_waste: estimate.formatted().to_string(),
            amount: estimate.amount().to_string(),
            base_waste: base_waste(input).to_string(),
            multipliers: Multipliers::for_input(input),
        };
        return render::print_json(&report);
    }

    println!("Monthly spend: {} / month", input.monthly_spend.display());
    println!(
        "Estimated wasted spend: {}",
        render::highlight(estimate.formatted())
    );
    Ok(())
}
