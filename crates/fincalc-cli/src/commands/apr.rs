use clap::Args;
use serde_json::Value;

use fincalc_core::apr::{self, AprInput, ConversionDirection, RateConversionInput};

use crate::commands::parse_frequency;
use crate::input;

/// Arguments for effective APR calculation
#[derive(Args)]
pub struct AprArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Option<f64>,

    /// Contract rate as a decimal (0.06 = 6%)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Flat origination and closing fees deducted from the disbursement
    #[arg(long, default_value = "0")]
    pub fees: f64,

    /// Discount points, each worth 1% of the loan amount
    #[arg(long, default_value = "0")]
    pub points: f64,
}

/// Arguments for APR/APY conversion
#[derive(Args)]
pub struct ConvertRateArgs {
    /// Rate to convert, as a decimal (0.06 = 6%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: f64,

    /// Conversion direction: apr-to-apy or apy-to-apr
    #[arg(long, default_value = "apr-to-apy")]
    pub direction: String,

    /// Compounding cadence: annual, semiannual, quarterly, monthly, biweekly,
    /// weekly, daily, continuous
    #[arg(long, default_value = "monthly")]
    pub compounding: String,
}

pub fn run_apr(args: AprArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let apr_input: AprInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let loan_amount = args
            .loan_amount
            .ok_or("--loan-amount is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        let term_years = args
            .term_years
            .ok_or("--term-years is required (or provide --input)")?;

        AprInput {
            loan_amount,
            nominal_annual_rate: rate,
            term_years,
            fees: args.fees,
            points: args.points,
        }
    };

    let result = apr::effective_apr(&apr_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_convert_rate(args: ConvertRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let direction = match args.direction.to_lowercase().as_str() {
        "apr-to-apy" | "to-apy" => ConversionDirection::AprToApy,
        "apy-to-apr" | "to-apr" => ConversionDirection::ApyToApr,
        other => {
            return Err(format!(
                "Unknown direction '{}'. Use: apr-to-apy or apy-to-apr",
                other
            )
            .into())
        }
    };

    let conv_input = RateConversionInput {
        rate: args.rate,
        compounding: parse_frequency(&args.compounding)?,
        direction,
    };

    let result = apr::convert_rate(&conv_input)?;
    Ok(serde_json::to_value(result)?)
}
