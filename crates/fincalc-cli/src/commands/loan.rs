use clap::Args;
use serde_json::Value;

use fincalc_core::loan::{self, LoanInput};

use crate::commands::parse_frequency;
use crate::input;

/// Arguments for the general loan calculator
#[derive(Args)]
pub struct LoanArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<f64>,

    /// Annual rate as a decimal (0.079 = 7.9%)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Payment cadence: annual, semiannual, quarterly, monthly, biweekly, weekly, daily
    #[arg(long, default_value = "monthly")]
    pub frequency: String,

    /// Attach the period-by-period amortization schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        let term_years = args
            .term_years
            .ok_or("--term-years is required (or provide --input)")?;

        LoanInput {
            principal,
            annual_rate: rate,
            term_years,
            frequency: parse_frequency(&args.frequency)?,
            include_schedule: args.schedule,
        }
    };

    let result = loan::calculate_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}
