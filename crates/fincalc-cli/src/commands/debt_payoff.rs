use clap::Args;
use serde_json::Value;

use fincalc_core::debt_payoff::{self, DebtPayoffInput};

use crate::input;

/// Arguments for the debt payoff planner
#[derive(Args)]
pub struct DebtPayoffArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Current balance owed
    #[arg(long)]
    pub balance: Option<f64>,

    /// Annual rate as a decimal (0.18 = 18%)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Fixed monthly payment
    #[arg(long)]
    pub payment: Option<f64>,

    /// Higher monthly payment to compare against the base plan
    #[arg(long)]
    pub accelerated: Option<f64>,
}

pub fn run_debt_payoff(args: DebtPayoffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payoff_input: DebtPayoffInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let balance = args
            .balance
            .ok_or("--balance is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        let payment = args
            .payment
            .ok_or("--payment is required (or provide --input)")?;

        DebtPayoffInput {
            balance,
            annual_rate: rate,
            monthly_payment: payment,
            accelerated_payment: args.accelerated,
        }
    };

    let result = debt_payoff::plan_debt_payoff(&payoff_input)?;
    Ok(serde_json::to_value(result)?)
}
