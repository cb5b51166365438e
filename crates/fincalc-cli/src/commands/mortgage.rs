use clap::Args;
use serde_json::Value;

use fincalc_core::mortgage::{self, MortgageInput};

use crate::input;

/// Arguments for the mortgage calculator
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<f64>,

    /// Cash down payment
    #[arg(long)]
    pub down_payment: Option<f64>,

    /// Annual rate as a decimal (0.065 = 6.5%)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub term_years: u32,

    /// Annual property tax escrowed into the monthly payment
    #[arg(long, default_value = "0")]
    pub property_tax: f64,

    /// Annual homeowners insurance escrowed into the monthly payment
    #[arg(long, default_value = "0")]
    pub insurance: f64,

    /// Monthly HOA dues
    #[arg(long, default_value = "0")]
    pub hoa: f64,

    /// Attach the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mtg_input: MortgageInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let home_price = args
            .home_price
            .ok_or("--home-price is required (or provide --input)")?;
        let down_payment = args
            .down_payment
            .ok_or("--down-payment is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;

        MortgageInput {
            home_price,
            down_payment,
            annual_rate: rate,
            term_years: args.term_years,
            property_tax_annual: args.property_tax,
            insurance_annual: args.insurance,
            hoa_monthly: args.hoa,
            include_schedule: args.schedule,
        }
    };

    let result = mortgage::calculate_mortgage(&mtg_input)?;
    Ok(serde_json::to_value(result)?)
}
