use clap::Args;
use serde_json::Value;

use fincalc_core::refinance::{self, RefinanceInput};

use crate::input;

/// Arguments for refinance analysis
#[derive(Args)]
pub struct RefinanceArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json|file.yaml> or stdin required for refinance analysis".into());
    };
    let result = refinance::analyze_refinance(&refi_input)?;
    Ok(serde_json::to_value(result)?)
}
