use clap::Args;
use serde_json::Value;

use fincalc_core::pension::{self, PensionInput};

use crate::input;

/// Arguments for the pension lump-sum comparison
#[derive(Args)]
pub struct PensionArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_pension(args: PensionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pension_input: PensionInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "--input <file.json|file.yaml> or stdin required for pension comparison".into(),
        );
    };
    let result = pension::compare_pension(&pension_input)?;
    Ok(serde_json::to_value(result)?)
}
