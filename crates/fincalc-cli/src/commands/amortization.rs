use clap::Args;
use serde_json::Value;

use fincalc_core::amortization::{self, AmortizationInput};

use crate::input;

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Option<f64>,

    /// Annual rate as a decimal (0.06 = 6%)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Loan term in months
    #[arg(long)]
    pub term_months: Option<u32>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let am_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let loan_amount = args
            .loan_amount
            .ok_or("--loan-amount is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        let term_months = args
            .term_months
            .ok_or("--term-months is required (or provide --input)")?;

        AmortizationInput {
            loan_amount,
            annual_rate: rate,
            term_months,
        }
    };

    let result = amortization::amortize(&am_input)?;
    Ok(serde_json::to_value(result)?)
}
